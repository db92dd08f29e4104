//! Catalog store: billboards and bookings persisted in SQLite.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::models::{
    validate_billboard, validate_booking, Billboard, Booking, BookingDetail, NewBillboard,
    NewBooking,
};
use crate::money::Money;

/// Read and write access to the inventory and its bookings.
///
/// Everything that renders documents depends on this trait rather than
/// on a concrete database.
pub trait CatalogRepository {
    fn insert_billboard(&self, new: &NewBillboard) -> Result<Billboard, CatalogError>;
    fn update_billboard(&self, board: &Billboard) -> Result<(), CatalogError>;
    /// Removes the billboard and every booking that references it.
    fn delete_billboard(&self, id: i64) -> Result<(), CatalogError>;
    fn billboard(&self, id: i64) -> Result<Billboard, CatalogError>;
    /// All billboards, ordered by id.
    fn billboards(&self) -> Result<Vec<Billboard>, CatalogError>;
    /// The billboards among `ids`, ordered by id. Unknown ids are skipped.
    fn billboards_by_ids(&self, ids: &[i64]) -> Result<Vec<Billboard>, CatalogError>;
    fn available_billboards(&self) -> Result<Vec<Billboard>, CatalogError>;

    fn insert_booking(&self, new: &NewBooking) -> Result<Booking, CatalogError>;
    /// Updates everything except `created_at`.
    fn update_booking(&self, booking: &Booking) -> Result<(), CatalogError>;
    fn delete_booking(&self, id: i64) -> Result<(), CatalogError>;
    fn booking(&self, id: i64) -> Result<BookingDetail, CatalogError>;
    /// All bookings, newest first.
    fn bookings(&self) -> Result<Vec<BookingDetail>, CatalogError>;
    /// The bookings among `ids`, ordered by id. Unknown ids are skipped.
    fn bookings_by_ids(&self, ids: &[i64]) -> Result<Vec<BookingDetail>, CatalogError>;
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS billboards (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        title           TEXT    NOT NULL,
        image           TEXT,
        sqft            INTEGER NOT NULL,
        size            TEXT    NOT NULL,
        description     TEXT    NOT NULL DEFAULT '',
        location        TEXT    NOT NULL,
        map_url         TEXT,
        is_available    INTEGER NOT NULL DEFAULT 1,
        price_per_month INTEGER NOT NULL DEFAULT 0 CHECK (price_per_month >= 0)
    );
    CREATE TABLE IF NOT EXISTS bookings (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        billboard_id    INTEGER NOT NULL REFERENCES billboards(id) ON DELETE CASCADE,
        customer_name   TEXT    NOT NULL,
        customer_email  TEXT    NOT NULL,
        customer_phone  TEXT    NOT NULL,
        start_date      TEXT    NOT NULL,
        duration_months INTEGER NOT NULL DEFAULT 1 CHECK (duration_months >= 1),
        total_amount    INTEGER NOT NULL CHECK (total_amount >= 0),
        created_at      TEXT    NOT NULL
    );
    CREATE INDEX IF NOT EXISTS bookings_billboard ON bookings(billboard_id);
";

const BILLBOARD_COLUMNS: &str = "id, title, image, sqft, size, description, location, map_url, \
                                 is_available, price_per_month";

/// Booking columns followed by the joined billboard columns.
const DETAIL_SELECT: &str = "
    SELECT k.id, k.billboard_id, k.customer_name, k.customer_email, k.customer_phone,
           k.start_date, k.duration_months, k.total_amount, k.created_at,
           b.id, b.title, b.image, b.sqft, b.size, b.description, b.location, b.map_url,
           b.is_available, b.price_per_month
    FROM bookings k
    JOIN billboards b ON b.id = k.billboard_id
";

/// SQLite-backed catalog. Owns its connection; one per request scope.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open (creating if needed) the database file and its schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let catalog = Self::from_connection(Connection::open(path)?)?;
        info!(path = %path.display(), "catalog opened");
        Ok(catalog)
    }

    /// A private in-memory database, used by tests and demos.
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, CatalogError> {
        // Cascading deletes need foreign keys switched on per connection.
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteCatalog { conn })
    }

    fn query_billboards(
        &self,
        sql: &str,
        ids: &[i64],
    ) -> Result<Vec<Billboard>, CatalogError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(ids), |row| billboard_from_row(row, 0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn query_details(&self, sql: &str, ids: &[i64]) -> Result<Vec<BookingDetail>, CatalogError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(ids), detail_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl CatalogRepository for SqliteCatalog {
    fn insert_billboard(&self, new: &NewBillboard) -> Result<Billboard, CatalogError> {
        new.validate()?;
        self.conn.execute(
            "INSERT INTO billboards (title, image, sqft, size, description, location, map_url,
                                     is_available, price_per_month)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                new.title,
                new.image,
                new.sqft,
                new.size,
                new.description,
                new.location,
                new.map_url,
                new.is_available,
                new.price_per_month.paise(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(billboard_id = id, title = %new.title, "billboard inserted");
        self.billboard(id)
    }

    fn update_billboard(&self, board: &Billboard) -> Result<(), CatalogError> {
        validate_billboard(&board.title, board.price_per_month)?;
        let changed = self.conn.execute(
            "UPDATE billboards
             SET title = ?2, image = ?3, sqft = ?4, size = ?5, description = ?6, location = ?7,
                 map_url = ?8, is_available = ?9, price_per_month = ?10
             WHERE id = ?1",
            params![
                board.id,
                board.title,
                board.image,
                board.sqft,
                board.size,
                board.description,
                board.location,
                board.map_url,
                board.is_available,
                board.price_per_month.paise(),
            ],
        )?;
        if changed == 0 {
            return Err(CatalogError::BillboardNotFound(board.id));
        }
        Ok(())
    }

    fn delete_billboard(&self, id: i64) -> Result<(), CatalogError> {
        let changed = self
            .conn
            .execute("DELETE FROM billboards WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(CatalogError::BillboardNotFound(id));
        }
        info!(billboard_id = id, "billboard deleted with its bookings");
        Ok(())
    }

    fn billboard(&self, id: i64) -> Result<Billboard, CatalogError> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM billboards WHERE id = ?1", BILLBOARD_COLUMNS),
                [id],
                |row| billboard_from_row(row, 0),
            )
            .optional()?
            .ok_or(CatalogError::BillboardNotFound(id))
    }

    fn billboards(&self) -> Result<Vec<Billboard>, CatalogError> {
        self.query_billboards(
            &format!("SELECT {} FROM billboards ORDER BY id", BILLBOARD_COLUMNS),
            &[],
        )
    }

    fn billboards_by_ids(&self, ids: &[i64]) -> Result<Vec<Billboard>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.query_billboards(
            &format!(
                "SELECT {} FROM billboards WHERE id IN ({}) ORDER BY id",
                BILLBOARD_COLUMNS,
                placeholders(ids.len())
            ),
            ids,
        )
    }

    fn available_billboards(&self) -> Result<Vec<Billboard>, CatalogError> {
        self.query_billboards(
            &format!(
                "SELECT {} FROM billboards WHERE is_available = 1 ORDER BY id",
                BILLBOARD_COLUMNS
            ),
            &[],
        )
    }

    fn insert_booking(&self, new: &NewBooking) -> Result<Booking, CatalogError> {
        new.validate()?;
        // Surface a clear error instead of a foreign key failure.
        self.billboard(new.billboard_id)?;
        self.conn.execute(
            "INSERT INTO bookings (billboard_id, customer_name, customer_email, customer_phone,
                                   start_date, duration_months, total_amount, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                new.billboard_id,
                new.customer_name,
                new.customer_email,
                new.customer_phone,
                new.start_date,
                new.duration_months,
                new.total_amount.paise(),
                Utc::now(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(booking_id = id, billboard_id = new.billboard_id, "booking inserted");
        Ok(self.booking(id)?.booking)
    }

    fn update_booking(&self, booking: &Booking) -> Result<(), CatalogError> {
        validate_booking(booking.duration_months, booking.total_amount)?;
        self.billboard(booking.billboard_id)?;
        let changed = self.conn.execute(
            "UPDATE bookings
             SET billboard_id = ?2, customer_name = ?3, customer_email = ?4, customer_phone = ?5,
                 start_date = ?6, duration_months = ?7, total_amount = ?8
             WHERE id = ?1",
            params![
                booking.id,
                booking.billboard_id,
                booking.customer_name,
                booking.customer_email,
                booking.customer_phone,
                booking.start_date,
                booking.duration_months,
                booking.total_amount.paise(),
            ],
        )?;
        if changed == 0 {
            return Err(CatalogError::BookingNotFound(booking.id));
        }
        Ok(())
    }

    fn delete_booking(&self, id: i64) -> Result<(), CatalogError> {
        let changed = self
            .conn
            .execute("DELETE FROM bookings WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(CatalogError::BookingNotFound(id));
        }
        Ok(())
    }

    fn booking(&self, id: i64) -> Result<BookingDetail, CatalogError> {
        self.conn
            .query_row(&format!("{} WHERE k.id = ?1", DETAIL_SELECT), [id], detail_from_row)
            .optional()?
            .ok_or(CatalogError::BookingNotFound(id))
    }

    fn bookings(&self) -> Result<Vec<BookingDetail>, CatalogError> {
        self.query_details(
            &format!("{} ORDER BY k.created_at DESC, k.id DESC", DETAIL_SELECT),
            &[],
        )
    }

    fn bookings_by_ids(&self, ids: &[i64]) -> Result<Vec<BookingDetail>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.query_details(
            &format!(
                "{} WHERE k.id IN ({}) ORDER BY k.id",
                DETAIL_SELECT,
                placeholders(ids.len())
            ),
            ids,
        )
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Read a billboard from `row`, starting at column `offset`.
fn billboard_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Billboard> {
    Ok(Billboard {
        id: row.get(offset)?,
        title: row.get(offset + 1)?,
        image: row.get(offset + 2)?,
        sqft: row.get(offset + 3)?,
        size: row.get(offset + 4)?,
        description: row.get(offset + 5)?,
        location: row.get(offset + 6)?,
        map_url: row.get(offset + 7)?,
        is_available: row.get(offset + 8)?,
        price_per_month: Money::from_paise(row.get(offset + 9)?),
    })
}

fn detail_from_row(row: &Row<'_>) -> rusqlite::Result<BookingDetail> {
    let booking = Booking {
        id: row.get(0)?,
        billboard_id: row.get(1)?,
        customer_name: row.get(2)?,
        customer_email: row.get(3)?,
        customer_phone: row.get(4)?,
        start_date: row.get(5)?,
        duration_months: row.get(6)?,
        total_amount: Money::from_paise(row.get(7)?),
        created_at: row.get(8)?,
    };
    Ok(BookingDetail {
        booking,
        billboard: billboard_from_row(row, 9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_board(title: &str, available: bool) -> NewBillboard {
        NewBillboard {
            title: title.to_string(),
            image: Some(format!("billboards/{}.jpg", title.to_lowercase())),
            sqft: 200,
            size: "20x10".to_string(),
            description: "Facing the bus stand".to_string(),
            location: "Kottayam".to_string(),
            map_url: None,
            is_available: available,
            price_per_month: Money::from_rupees(15000),
        }
    }

    fn new_booking(billboard_id: i64, email: &str) -> NewBooking {
        NewBooking {
            billboard_id,
            customer_name: "Asha Traders".to_string(),
            customer_email: email.to_string(),
            customer_phone: "9447000000".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            duration_months: 3,
            total_amount: Money::from_rupees(53100),
        }
    }

    #[test]
    fn billboard_round_trip() {
        let cat = SqliteCatalog::open_in_memory().unwrap();
        let board = cat.insert_billboard(&new_board("Central", true)).unwrap();
        assert!(board.id > 0);
        assert_eq!(board.price_per_month, Money::from_rupees(15000));
        assert_eq!(cat.billboard(board.id).unwrap(), board);
    }

    #[test]
    fn available_filter() {
        let cat = SqliteCatalog::open_in_memory().unwrap();
        cat.insert_billboard(&new_board("A", true)).unwrap();
        cat.insert_billboard(&new_board("B", false)).unwrap();
        cat.insert_billboard(&new_board("C", true)).unwrap();
        let titles: Vec<String> = cat
            .available_billboards()
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert_eq!(cat.billboards().unwrap().len(), 3);
    }

    #[test]
    fn selection_skips_unknown_ids() {
        let cat = SqliteCatalog::open_in_memory().unwrap();
        let a = cat.insert_billboard(&new_board("A", true)).unwrap();
        let b = cat.insert_billboard(&new_board("B", true)).unwrap();
        let picked = cat.billboards_by_ids(&[b.id, 999, a.id]).unwrap();
        assert_eq!(
            picked.iter().map(|x| x.id).collect::<Vec<_>>(),
            vec![a.id, b.id]
        );
        assert!(cat.billboards_by_ids(&[]).unwrap().is_empty());
    }

    #[test]
    fn negative_price_rejected() {
        let cat = SqliteCatalog::open_in_memory().unwrap();
        let mut board = new_board("A", true);
        board.price_per_month = Money::from_paise(-1);
        assert!(matches!(
            cat.insert_billboard(&board),
            Err(CatalogError::Invalid { .. })
        ));
    }

    #[test]
    fn booking_carries_its_billboard() {
        let cat = SqliteCatalog::open_in_memory().unwrap();
        let board = cat.insert_billboard(&new_board("Central", true)).unwrap();
        let booking = cat
            .insert_booking(&new_booking(board.id, "asha@example.com"))
            .unwrap();
        let detail = cat.booking(booking.id).unwrap();
        assert_eq!(detail.booking, booking);
        assert_eq!(detail.billboard, board);
        assert_eq!(
            booking.start_date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn created_at_survives_updates() {
        let cat = SqliteCatalog::open_in_memory().unwrap();
        let board = cat.insert_billboard(&new_board("Central", true)).unwrap();
        let mut booking = cat
            .insert_booking(&new_booking(board.id, "asha@example.com"))
            .unwrap();
        let stamped = booking.created_at;
        booking.customer_name = "Asha & Sons".to_string();
        booking.created_at = stamped + chrono::Duration::days(365);
        cat.update_booking(&booking).unwrap();
        let stored = cat.booking(booking.id).unwrap().booking;
        assert_eq!(stored.customer_name, "Asha & Sons");
        assert_eq!(stored.created_at, stamped);
    }

    #[test]
    fn booking_for_missing_billboard() {
        let cat = SqliteCatalog::open_in_memory().unwrap();
        assert!(matches!(
            cat.insert_booking(&new_booking(42, "x@example.com")),
            Err(CatalogError::BillboardNotFound(42))
        ));
    }

    #[test]
    fn zero_duration_rejected() {
        let cat = SqliteCatalog::open_in_memory().unwrap();
        let board = cat.insert_billboard(&new_board("Central", true)).unwrap();
        let mut b = new_booking(board.id, "x@example.com");
        b.duration_months = 0;
        assert!(cat.insert_booking(&b).is_err());
    }

    #[test]
    fn deleting_billboard_cascades() {
        let cat = SqliteCatalog::open_in_memory().unwrap();
        let keep = cat.insert_billboard(&new_board("Keep", true)).unwrap();
        let gone = cat.insert_billboard(&new_board("Gone", true)).unwrap();
        let kept = cat
            .insert_booking(&new_booking(keep.id, "a@example.com"))
            .unwrap();
        let dropped = cat
            .insert_booking(&new_booking(gone.id, "b@example.com"))
            .unwrap();

        cat.delete_billboard(gone.id).unwrap();

        assert!(matches!(
            cat.booking(dropped.id),
            Err(CatalogError::BookingNotFound(_))
        ));
        assert!(cat.booking(kept.id).is_ok());
        assert_eq!(cat.bookings().unwrap().len(), 1);
    }

    #[test]
    fn bookings_newest_first() {
        let cat = SqliteCatalog::open_in_memory().unwrap();
        let board = cat.insert_billboard(&new_board("Central", true)).unwrap();
        let first = cat
            .insert_booking(&new_booking(board.id, "a@example.com"))
            .unwrap();
        let second = cat
            .insert_booking(&new_booking(board.id, "b@example.com"))
            .unwrap();
        let ids: Vec<i64> = cat
            .bookings()
            .unwrap()
            .iter()
            .map(|d| d.booking.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn update_missing_billboard() {
        let cat = SqliteCatalog::open_in_memory().unwrap();
        let mut board = cat.insert_billboard(&new_board("A", true)).unwrap();
        board.id = 77;
        assert!(matches!(
            cat.update_billboard(&board),
            Err(CatalogError::BillboardNotFound(77))
        ));
    }
}
