use crate::database::models::{
    AnnouncementRecord, EmergencyRecord, EquipmentRecord, IcuRecord, ReplaceSummary,
    UpsertSummary,
};
use crate::error::QueryError;
use chrono::NaiveDateTime;
use sqlx::{PgConnection, Pool, Postgres};
use tracing::{debug, warn};

/// A typed row in one of the per-category snapshot tables. Each implementor
/// owns its statements, with column list and bind list side by side so the
/// two cannot drift apart.
pub trait SnapshotRecord {
    const TABLE: &'static str;

    fn hpid(&self) -> &str;

    async fn insert(
        &self,
        conn: &mut PgConnection,
        stamped_at: NaiveDateTime,
    ) -> Result<(), QueryError>;

    async fn update(
        &self,
        conn: &mut PgConnection,
        stamped_at: NaiveDateTime,
    ) -> Result<(), QueryError>;
}

/// Reconciles one batch against the table's current rows: records whose hpid
/// already exists update in place, the rest insert with both timestamps. The
/// batch shares one transaction; any failure rolls the whole thing back.
pub async fn upsert_snapshot<R: SnapshotRecord>(
    pool: &Pool<Postgres>,
    records: &[R],
    stamped_at: NaiveDateTime,
) -> Result<UpsertSummary, QueryError> {
    let exists_query = format!("SELECT COUNT(*) FROM {} WHERE hpid = $1", R::TABLE);
    let mut tx = pool.begin().await?;
    let mut summary = UpsertSummary::default();

    for record in records {
        let existing = sqlx::query_scalar::<_, i64>(&exists_query)
            .bind(record.hpid())
            .fetch_one(tx.as_mut())
            .await?;

        if existing > 0 {
            record.update(tx.as_mut(), stamped_at).await?;
            debug!(table = R::TABLE, hpid = record.hpid(), "updated snapshot row");
            summary.updated += 1;
        } else {
            record.insert(tx.as_mut(), stamped_at).await?;
            debug!(table = R::TABLE, hpid = record.hpid(), "inserted snapshot row");
            summary.inserted += 1;
        }
    }

    tx.commit().await?;
    Ok(summary)
}

async fn lookup_hospital_id(
    conn: &mut PgConnection,
    hpid: &str,
) -> Result<Option<i32>, QueryError> {
    sqlx::query_scalar::<_, i32>("SELECT hospital_id FROM hospital WHERE hpid = $1")
        .bind(hpid)
        .fetch_optional(conn)
        .await
        .map_err(QueryError::from)
}

/// Replaces the announcement table with this batch. Records whose hpid has no
/// hospital row are skipped; the delete and all inserts share one transaction,
/// so a failure leaves the previous snapshot intact.
pub async fn replace_announcements(
    pool: &Pool<Postgres>,
    records: &[AnnouncementRecord],
    stamped_at: NaiveDateTime,
) -> Result<ReplaceSummary, QueryError> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM er_announcement")
        .execute(tx.as_mut())
        .await?
        .rows_affected();
    debug!(deleted, "cleared er_announcement");

    let mut summary = ReplaceSummary {
        deleted,
        ..ReplaceSummary::default()
    };

    for record in records {
        let Some(hospital_id) = lookup_hospital_id(tx.as_mut(), &record.hpid).await? else {
            warn!(hpid = %record.hpid, "no hospital row for announcement, skipping");
            summary.skipped += 1;
            continue;
        };

        sqlx::query(
            r"
            INSERT INTO er_announcement (
                hospital_id, msg_type, message, disease_type,
                start_time, end_time, created_at, modified_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ",
        )
        .bind(hospital_id)
        .bind(&record.msg_type)
        .bind(&record.message)
        .bind(&record.disease_type)
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(stamped_at)
        .execute(tx.as_mut())
        .await?;
        debug!(hpid = %record.hpid, hospital_id, "inserted announcement row");
        summary.inserted += 1;
    }

    tx.commit().await?;
    Ok(summary)
}

impl SnapshotRecord for EquipmentRecord {
    const TABLE: &'static str = "equipment";

    fn hpid(&self) -> &str {
        &self.hpid
    }

    async fn insert(
        &self,
        conn: &mut PgConnection,
        stamped_at: NaiveDateTime,
    ) -> Result<(), QueryError> {
        sqlx::query(
            r"
            INSERT INTO equipment (
                hpid,
                hvventiayn, hvventisoayn, hvincuayn, hvcrrtayn, hvecmoayn,
                hvhypoayn, hvoxyayn, hvctayn, hvmriayn, hvangioayn,
                hvs30, hvs31, hvs32, hvs33, hvs34, hvs35, hvs37,
                hvs27, hvs28, hvs29,
                created_at, modified_at
            )
            VALUES (
                $1,
                $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21,
                $22, $22
            )
            ",
        )
        .bind(&self.hpid)
        .bind(self.hvventiayn)
        .bind(self.hvventisoayn)
        .bind(self.hvincuayn)
        .bind(self.hvcrrtayn)
        .bind(self.hvecmoayn)
        .bind(self.hvhypoayn)
        .bind(self.hvoxyayn)
        .bind(self.hvctayn)
        .bind(self.hvmriayn)
        .bind(self.hvangioayn)
        .bind(self.hvs30)
        .bind(self.hvs31)
        .bind(self.hvs32)
        .bind(self.hvs33)
        .bind(self.hvs34)
        .bind(self.hvs35)
        .bind(self.hvs37)
        .bind(self.hvs27)
        .bind(self.hvs28)
        .bind(self.hvs29)
        .bind(stamped_at)
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(QueryError::from)
    }

    async fn update(
        &self,
        conn: &mut PgConnection,
        stamped_at: NaiveDateTime,
    ) -> Result<(), QueryError> {
        sqlx::query(
            r"
            UPDATE equipment
            SET
                hvventiayn = $2, hvventisoayn = $3, hvincuayn = $4,
                hvcrrtayn = $5, hvecmoayn = $6, hvhypoayn = $7,
                hvoxyayn = $8, hvctayn = $9, hvmriayn = $10, hvangioayn = $11,
                hvs30 = $12, hvs31 = $13, hvs32 = $14, hvs33 = $15,
                hvs34 = $16, hvs35 = $17, hvs37 = $18, hvs27 = $19,
                hvs28 = $20, hvs29 = $21,
                modified_at = $22
            WHERE hpid = $1
            ",
        )
        .bind(&self.hpid)
        .bind(self.hvventiayn)
        .bind(self.hvventisoayn)
        .bind(self.hvincuayn)
        .bind(self.hvcrrtayn)
        .bind(self.hvecmoayn)
        .bind(self.hvhypoayn)
        .bind(self.hvoxyayn)
        .bind(self.hvctayn)
        .bind(self.hvmriayn)
        .bind(self.hvangioayn)
        .bind(self.hvs30)
        .bind(self.hvs31)
        .bind(self.hvs32)
        .bind(self.hvs33)
        .bind(self.hvs34)
        .bind(self.hvs35)
        .bind(self.hvs37)
        .bind(self.hvs27)
        .bind(self.hvs28)
        .bind(self.hvs29)
        .bind(stamped_at)
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(QueryError::from)
    }
}

impl SnapshotRecord for IcuRecord {
    const TABLE: &'static str = "icu";

    fn hpid(&self) -> &str {
        &self.hpid
    }

    async fn insert(
        &self,
        conn: &mut PgConnection,
        stamped_at: NaiveDateTime,
    ) -> Result<(), QueryError> {
        sqlx::query(
            r"
            INSERT INTO icu (
                hpid,
                hvcc, hvncc, hvccc, hvicc,
                hv2, hv3, hv6, hv8, hv9, hv32, hv34, hv35,
                hvs11, hvs08, hvs16, hvs17, hvs06, hvs07,
                hvs12, hvs13, hvs14, hvs09, hvs15, hvs18,
                created_at, modified_at
            )
            VALUES (
                $1,
                $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25,
                $26, $26
            )
            ",
        )
        .bind(&self.hpid)
        .bind(self.hvcc)
        .bind(self.hvncc)
        .bind(self.hvccc)
        .bind(self.hvicc)
        .bind(self.hv2)
        .bind(self.hv3)
        .bind(self.hv6)
        .bind(self.hv8)
        .bind(self.hv9)
        .bind(self.hv32)
        .bind(self.hv34)
        .bind(self.hv35)
        .bind(self.hvs11)
        .bind(self.hvs08)
        .bind(self.hvs16)
        .bind(self.hvs17)
        .bind(self.hvs06)
        .bind(self.hvs07)
        .bind(self.hvs12)
        .bind(self.hvs13)
        .bind(self.hvs14)
        .bind(self.hvs09)
        .bind(self.hvs15)
        .bind(self.hvs18)
        .bind(stamped_at)
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(QueryError::from)
    }

    async fn update(
        &self,
        conn: &mut PgConnection,
        stamped_at: NaiveDateTime,
    ) -> Result<(), QueryError> {
        sqlx::query(
            r"
            UPDATE icu
            SET
                hvcc = $2, hvncc = $3, hvccc = $4, hvicc = $5,
                hv2 = $6, hv3 = $7, hv6 = $8, hv8 = $9, hv9 = $10,
                hv32 = $11, hv34 = $12, hv35 = $13,
                hvs11 = $14, hvs08 = $15, hvs16 = $16, hvs17 = $17,
                hvs06 = $18, hvs07 = $19, hvs12 = $20, hvs13 = $21,
                hvs14 = $22, hvs09 = $23, hvs15 = $24, hvs18 = $25,
                modified_at = $26
            WHERE hpid = $1
            ",
        )
        .bind(&self.hpid)
        .bind(self.hvcc)
        .bind(self.hvncc)
        .bind(self.hvccc)
        .bind(self.hvicc)
        .bind(self.hv2)
        .bind(self.hv3)
        .bind(self.hv6)
        .bind(self.hv8)
        .bind(self.hv9)
        .bind(self.hv32)
        .bind(self.hv34)
        .bind(self.hv35)
        .bind(self.hvs11)
        .bind(self.hvs08)
        .bind(self.hvs16)
        .bind(self.hvs17)
        .bind(self.hvs06)
        .bind(self.hvs07)
        .bind(self.hvs12)
        .bind(self.hvs13)
        .bind(self.hvs14)
        .bind(self.hvs09)
        .bind(self.hvs15)
        .bind(self.hvs18)
        .bind(stamped_at)
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(QueryError::from)
    }
}

impl SnapshotRecord for EmergencyRecord {
    const TABLE: &'static str = "emergency";

    fn hpid(&self) -> &str {
        &self.hpid
    }

    async fn insert(
        &self,
        conn: &mut PgConnection,
        stamped_at: NaiveDateTime,
    ) -> Result<(), QueryError> {
        sqlx::query(
            r"
            INSERT INTO emergency (
                hpid,
                hvec, hv27, hv29, hv30, hv28, hv15, hv16,
                hvs01, hvs59, hvs03, hvs04, hvs02, hvs48, hvs49,
                created_at, modified_at
            )
            VALUES (
                $1,
                $2, $3, $4, $5, $6, $7, $8,
                $9, $10, $11, $12, $13, $14, $15,
                $16, $16
            )
            ",
        )
        .bind(&self.hpid)
        .bind(self.hvec)
        .bind(self.hv27)
        .bind(self.hv29)
        .bind(self.hv30)
        .bind(self.hv28)
        .bind(self.hv15)
        .bind(self.hv16)
        .bind(self.hvs01)
        .bind(self.hvs59)
        .bind(self.hvs03)
        .bind(self.hvs04)
        .bind(self.hvs02)
        .bind(self.hvs48)
        .bind(self.hvs49)
        .bind(stamped_at)
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(QueryError::from)
    }

    async fn update(
        &self,
        conn: &mut PgConnection,
        stamped_at: NaiveDateTime,
    ) -> Result<(), QueryError> {
        sqlx::query(
            r"
            UPDATE emergency
            SET
                hvec = $2, hv27 = $3, hv29 = $4, hv30 = $5, hv28 = $6,
                hv15 = $7, hv16 = $8, hvs01 = $9, hvs59 = $10,
                hvs03 = $11, hvs04 = $12, hvs02 = $13, hvs48 = $14,
                hvs49 = $15,
                modified_at = $16
            WHERE hpid = $1
            ",
        )
        .bind(&self.hpid)
        .bind(self.hvec)
        .bind(self.hv27)
        .bind(self.hv29)
        .bind(self.hv30)
        .bind(self.hv28)
        .bind(self.hv15)
        .bind(self.hv16)
        .bind(self.hvs01)
        .bind(self.hvs59)
        .bind(self.hvs03)
        .bind(self.hvs04)
        .bind(self.hvs02)
        .bind(self.hvs48)
        .bind(self.hvs49)
        .bind(stamped_at)
        .execute(conn)
        .await
        .map(|_| ())
        .map_err(QueryError::from)
    }
}
