use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JenisPaket {
    pub id: i32,
    pub nama_paket: String,
    pub created_at: DateTime<Utc>,
}

impl JenisPaket {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(JenisPaket {
            id: row.try_get("id")?,
            nama_paket: row.try_get("nama_paket")?,
            created_at: row.try_get("created_at")?,
        })
    }

    /// Kolom jenis_paket yang di-join ke query makanan (alias jp_*).
    fn from_joined_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(JenisPaket {
            id: row.try_get("jp_id")?,
            nama_paket: row.try_get("jp_nama_paket")?,
            created_at: row.try_get("jp_created_at")?,
        })
    }
}

/// Item listing GET /api/jenis-paket: paket plus jumlah makanan yang terkait.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JenisPaketSummary {
    pub id: i32,
    pub nama_paket: String,
    pub created_at: DateTime<Utc>,
    pub makanan_count: i64,
}

impl JenisPaketSummary {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(JenisPaketSummary {
            id: row.try_get("id")?,
            nama_paket: row.try_get("nama_paket")?,
            created_at: row.try_get("created_at")?,
            makanan_count: row.try_get("makanan_count")?,
        })
    }
}

/// Detail GET /api/jenis-paket/{id}: paket plus daftar makanannya.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JenisPaketDetail {
    pub id: i32,
    pub nama_paket: String,
    pub created_at: DateTime<Utc>,
    pub makanan: Vec<Makanan>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Makanan {
    pub id: i32,
    pub nama_makanan: String,
    pub deskripsi: String,
    /// Selalu array URL di response, apapun bentuk kolomnya di database.
    pub foto: Vec<String>,
    pub harga: i32,
    pub jenis_paket_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Makanan {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        let raw_foto: String = row.try_get("foto")?;
        Ok(Makanan {
            id: row.try_get("id")?,
            nama_makanan: row.try_get("nama_makanan")?,
            deskripsi: row.try_get("deskripsi")?,
            foto: parse_foto(&raw_foto),
            harga: row.try_get("harga")?,
            jenis_paket_id: row.try_get("jenis_paket_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Makanan plus jenis paket pemiliknya, untuk response GET /api/makanan.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakananWithJenis {
    pub id: i32,
    pub nama_makanan: String,
    pub deskripsi: String,
    pub foto: Vec<String>,
    pub harga: i32,
    pub jenis_paket_id: i32,
    pub created_at: DateTime<Utc>,
    pub jenis_paket: JenisPaket,
}

impl MakananWithJenis {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        let makanan = Makanan::from_row(row)?;
        let jenis_paket = JenisPaket::from_joined_row(row)?;
        Ok(MakananWithJenis {
            id: makanan.id,
            nama_makanan: makanan.nama_makanan,
            deskripsi: makanan.deskripsi,
            foto: makanan.foto,
            harga: makanan.harga,
            jenis_paket_id: makanan.jenis_paket_id,
            created_at: makanan.created_at,
            jenis_paket,
        })
    }
}

/// Normalisasi kolom `foto` saat dibaca.
///
/// Kolom seharusnya berisi JSON array URL, tapi row lama bisa berupa URL
/// polos. URL polos dideteksi (bukan JSON valid) dan dibungkus jadi array
/// satu elemen. String kosong menghasilkan array kosong.
pub fn parse_foto(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(trimmed) {
        Ok(urls) => urls
            .into_iter()
            .filter(|url| !url.trim().is_empty())
            .collect(),
        Err(_) => vec![trimmed.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_foto_reads_json_array() {
        let urls = parse_foto(r#"["http://x/a.png","http://x/b.png"]"#);
        assert_eq!(urls, vec!["http://x/a.png", "http://x/b.png"]);
    }

    #[test]
    fn parse_foto_wraps_legacy_bare_url() {
        let urls = parse_foto("http://x/img.png");
        assert_eq!(urls, vec!["http://x/img.png"]);
    }

    #[test]
    fn parse_foto_drops_empty_entries() {
        let urls = parse_foto(r#"["", "http://x/a.png", "  "]"#);
        assert_eq!(urls, vec!["http://x/a.png"]);
    }

    #[test]
    fn parse_foto_empty_column_is_empty_list() {
        assert!(parse_foto("").is_empty());
        assert!(parse_foto("   ").is_empty());
    }

    #[test]
    fn parse_foto_non_array_json_is_treated_as_bare_url() {
        // kolom berisi JSON object tak terduga: jangan panik, anggap legacy
        let urls = parse_foto(r#"{"url":"http://x/a.png"}"#);
        assert_eq!(urls, vec![r#"{"url":"http://x/a.png"}"#]);
    }
}
