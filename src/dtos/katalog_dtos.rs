use serde::{Deserialize, Serialize};

/// Body POST/PUT /api/jenis-paket.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JenisPaketInput {
    pub nama_paket: Option<String>,
}

/// Kolom `foto` di request makanan: frontend lama mengirim satu URL string,
/// yang baru mengirim array. Dua-duanya diterima dan disimpan sebagai
/// JSON array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FotoField {
    One(String),
    Many(Vec<String>),
}

impl FotoField {
    pub fn urls(&self) -> Vec<String> {
        match self {
            FotoField::One(url) => vec![url.clone()],
            FotoField::Many(urls) => urls.clone(),
        }
    }

    /// Serialisasi ke bentuk kolom database (JSON array URL).
    pub fn to_column(&self) -> String {
        serde_json::to_string(&self.urls()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Minimal satu URL non-kosong.
    pub fn is_empty(&self) -> bool {
        self.urls().iter().all(|url| url.trim().is_empty())
    }
}

/// Body POST/PUT /api/makanan.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakananInput {
    pub nama_makanan: Option<String>,
    pub deskripsi: Option<String>,
    pub foto: Option<FotoField>,
    pub harga: Option<i32>,
    pub jenis_paket_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foto_field_accepts_bare_string() {
        let foto: FotoField = serde_json::from_str(r#""http://x/img.png""#).unwrap();
        assert_eq!(foto.to_column(), r#"["http://x/img.png"]"#);
    }

    #[test]
    fn foto_field_accepts_array() {
        let foto: FotoField = serde_json::from_str(r#"["http://x/a.png","http://x/b.png"]"#).unwrap();
        assert_eq!(foto.urls().len(), 2);
        assert_eq!(foto.to_column(), r#"["http://x/a.png","http://x/b.png"]"#);
    }

    #[test]
    fn foto_field_empty_detection() {
        let blank: FotoField = serde_json::from_str(r#"["", "  "]"#).unwrap();
        assert!(blank.is_empty());
        let filled: FotoField = serde_json::from_str(r#""http://x/img.png""#).unwrap();
        assert!(!filled.is_empty());
    }

    #[test]
    fn makanan_input_parses_camel_case_body() {
        let body = r#"{
            "namaMakanan": "Nasi Kotak",
            "deskripsi": "Paket nasi",
            "foto": "http://x/img.png",
            "harga": 25000,
            "jenisPaketId": 1
        }"#;
        let input: MakananInput = serde_json::from_str(body).unwrap();
        assert_eq!(input.nama_makanan.as_deref(), Some("Nasi Kotak"));
        assert_eq!(input.harga, Some(25000));
        assert_eq!(input.jenis_paket_id, Some(1));
    }
}
