// src/repositories/katalog_repository.rs
use crate::db::{Db, DbError};
use crate::models::katalog::{
    JenisPaket, JenisPaketDetail, JenisPaketSummary, Makanan, MakananWithJenis,
};

const MAKANAN_WITH_JENIS: &str = "SELECT m.id, m.nama_makanan, m.deskripsi, m.foto, m.harga, \
     m.jenis_paket_id, m.created_at, \
     jp.id AS jp_id, jp.nama_paket AS jp_nama_paket, jp.created_at AS jp_created_at \
     FROM makanan m JOIN jenis_paket jp ON jp.id = m.jenis_paket_id";

/// Data makanan yang sudah tervalidasi, siap disimpan.
/// `foto` sudah dinormalisasi jadi JSON array oleh handler.
#[derive(Debug)]
pub struct NewMakanan {
    pub nama_makanan: String,
    pub deskripsi: String,
    pub foto: String,
    pub harga: i32,
    pub jenis_paket_id: i32,
}

#[derive(Debug)]
pub enum MakananWriteOutcome {
    JenisPaketNotFound,
    NotFound,
    Saved(MakananWithJenis),
}

#[derive(Debug)]
pub enum DeleteJenisPaketOutcome {
    NotFound,
    HasMakanan(i64),
    Deleted,
}

pub struct KatalogRepository;

impl KatalogRepository {
    pub async fn list_jenis_paket(db: &Db) -> Result<Vec<JenisPaketSummary>, DbError> {
        db.run(|client| async move {
            let rows = client
                .query(
                    "SELECT jp.id, jp.nama_paket, jp.created_at, COUNT(m.id) AS makanan_count \
                     FROM jenis_paket jp \
                     LEFT JOIN makanan m ON m.jenis_paket_id = jp.id \
                     GROUP BY jp.id, jp.nama_paket, jp.created_at \
                     ORDER BY jp.created_at DESC",
                    &[],
                )
                .await?;
            rows.iter().map(JenisPaketSummary::from_row).collect()
        })
        .await
    }

    pub async fn create_jenis_paket(db: &Db, nama_paket: &str) -> Result<JenisPaket, DbError> {
        db.run(|client| async move {
            let row = client
                .query_one(
                    "INSERT INTO jenis_paket (nama_paket) VALUES ($1) \
                     RETURNING id, nama_paket, created_at",
                    &[&nama_paket],
                )
                .await?;
            JenisPaket::from_row(&row)
        })
        .await
    }

    pub async fn find_jenis_paket(
        db: &Db,
        id: i32,
    ) -> Result<Option<JenisPaketDetail>, DbError> {
        db.run(|client| async move {
            let row = client
                .query_opt(
                    "SELECT id, nama_paket, created_at FROM jenis_paket WHERE id = $1",
                    &[&id],
                )
                .await?;
            let paket = match row {
                Some(row) => JenisPaket::from_row(&row)?,
                None => return Ok(None),
            };

            let makanan_rows = client
                .query(
                    "SELECT id, nama_makanan, deskripsi, foto, harga, jenis_paket_id, created_at \
                     FROM makanan WHERE jenis_paket_id = $1 ORDER BY created_at DESC",
                    &[&id],
                )
                .await?;
            let makanan = makanan_rows
                .iter()
                .map(Makanan::from_row)
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Some(JenisPaketDetail {
                id: paket.id,
                nama_paket: paket.nama_paket,
                created_at: paket.created_at,
                makanan,
            }))
        })
        .await
    }

    pub async fn update_jenis_paket(
        db: &Db,
        id: i32,
        nama_paket: &str,
    ) -> Result<Option<JenisPaket>, DbError> {
        db.run(|client| async move {
            let row = client
                .query_opt(
                    "UPDATE jenis_paket SET nama_paket = $2 WHERE id = $1 \
                     RETURNING id, nama_paket, created_at",
                    &[&id, &nama_paket],
                )
                .await?;
            row.as_ref().map(JenisPaket::from_row).transpose()
        })
        .await
    }

    /// Paket yang masih punya makanan tidak boleh dihapus; dicek lewat count,
    /// FK constraint di schema jadi jaring pengaman terakhir.
    pub async fn delete_jenis_paket(db: &Db, id: i32) -> Result<DeleteJenisPaketOutcome, DbError> {
        db.run(|client| async move {
            let exists = client
                .query_opt("SELECT id FROM jenis_paket WHERE id = $1", &[&id])
                .await?;
            if exists.is_none() {
                return Ok(DeleteJenisPaketOutcome::NotFound);
            }

            let count_row = client
                .query_one(
                    "SELECT COUNT(*) AS makanan_count FROM makanan WHERE jenis_paket_id = $1",
                    &[&id],
                )
                .await?;
            let makanan_count: i64 = count_row.try_get("makanan_count")?;
            if makanan_count > 0 {
                return Ok(DeleteJenisPaketOutcome::HasMakanan(makanan_count));
            }

            client
                .execute("DELETE FROM jenis_paket WHERE id = $1", &[&id])
                .await?;
            Ok(DeleteJenisPaketOutcome::Deleted)
        })
        .await
    }

    pub async fn list_makanan(db: &Db) -> Result<Vec<MakananWithJenis>, DbError> {
        db.run(|client| async move {
            let query = format!("{} ORDER BY m.created_at DESC", MAKANAN_WITH_JENIS);
            let rows = client.query(query.as_str(), &[]).await?;
            rows.iter().map(MakananWithJenis::from_row).collect()
        })
        .await
    }

    pub async fn find_makanan(db: &Db, id: i32) -> Result<Option<MakananWithJenis>, DbError> {
        db.run(|client| async move {
            let query = format!("{} WHERE m.id = $1", MAKANAN_WITH_JENIS);
            let row = client.query_opt(query.as_str(), &[&id]).await?;
            row.as_ref().map(MakananWithJenis::from_row).transpose()
        })
        .await
    }

    pub async fn create_makanan(
        db: &Db,
        input: &NewMakanan,
    ) -> Result<MakananWriteOutcome, DbError> {
        db.run(|client| async move {
            let jenis_row = client
                .query_opt(
                    "SELECT id, nama_paket, created_at FROM jenis_paket WHERE id = $1",
                    &[&input.jenis_paket_id],
                )
                .await?;
            let jenis_paket = match jenis_row {
                Some(row) => JenisPaket::from_row(&row)?,
                None => return Ok(MakananWriteOutcome::JenisPaketNotFound),
            };

            let row = client
                .query_one(
                    "INSERT INTO makanan (nama_makanan, deskripsi, foto, harga, jenis_paket_id) \
                     VALUES ($1, $2, $3, $4, $5) \
                     RETURNING id, nama_makanan, deskripsi, foto, harga, jenis_paket_id, created_at",
                    &[
                        &input.nama_makanan,
                        &input.deskripsi,
                        &input.foto,
                        &input.harga,
                        &input.jenis_paket_id,
                    ],
                )
                .await?;
            let makanan = Makanan::from_row(&row)?;
            Ok(MakananWriteOutcome::Saved(with_jenis(makanan, jenis_paket)))
        })
        .await
    }

    pub async fn update_makanan(
        db: &Db,
        id: i32,
        input: &NewMakanan,
    ) -> Result<MakananWriteOutcome, DbError> {
        db.run(|client| async move {
            let jenis_row = client
                .query_opt(
                    "SELECT id, nama_paket, created_at FROM jenis_paket WHERE id = $1",
                    &[&input.jenis_paket_id],
                )
                .await?;
            let jenis_paket = match jenis_row {
                Some(row) => JenisPaket::from_row(&row)?,
                None => return Ok(MakananWriteOutcome::JenisPaketNotFound),
            };

            let row = client
                .query_opt(
                    "UPDATE makanan SET nama_makanan = $2, deskripsi = $3, foto = $4, \
                     harga = $5, jenis_paket_id = $6 WHERE id = $1 \
                     RETURNING id, nama_makanan, deskripsi, foto, harga, jenis_paket_id, created_at",
                    &[
                        &id,
                        &input.nama_makanan,
                        &input.deskripsi,
                        &input.foto,
                        &input.harga,
                        &input.jenis_paket_id,
                    ],
                )
                .await?;
            match row {
                Some(row) => {
                    let makanan = Makanan::from_row(&row)?;
                    Ok(MakananWriteOutcome::Saved(with_jenis(makanan, jenis_paket)))
                }
                None => Ok(MakananWriteOutcome::NotFound),
            }
        })
        .await
    }

    pub async fn delete_makanan(db: &Db, id: i32) -> Result<bool, DbError> {
        db.run(|client| async move {
            let deleted = client
                .execute("DELETE FROM makanan WHERE id = $1", &[&id])
                .await?;
            Ok(deleted > 0)
        })
        .await
    }
}

fn with_jenis(makanan: Makanan, jenis_paket: JenisPaket) -> MakananWithJenis {
    MakananWithJenis {
        id: makanan.id,
        nama_makanan: makanan.nama_makanan,
        deskripsi: makanan.deskripsi,
        foto: makanan.foto,
        harga: makanan.harga,
        jenis_paket_id: makanan.jenis_paket_id,
        created_at: makanan.created_at,
        jenis_paket,
    }
}
