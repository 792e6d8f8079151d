/// SQLite implementation of the library store
use crate::error::{Result, StorageError};
use aria_core::types::{Playlist, PlaylistId, Song, SongId};
use aria_core::{AriaError, LibraryStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// SQLite-backed song and playlist persistence
pub struct SqliteLibraryStore {
    pool: SqlitePool,
}

impl SqliteLibraryStore {
    /// Open (or create) a database and run migrations
    ///
    /// # Errors
    /// Returns an error if the connection fails or migrations fail
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool (for testing); migrations must have run
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an in-memory database (for testing)
    ///
    /// Uses a single pooled connection: every connection to
    /// `sqlite::memory:` gets its own database, so the pool must not open
    /// a second one.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        // Embedded migrations for reliability across execution contexts
        const MIGRATIONS: &[&str] = &[
            include_str!("../migrations/0001_create_songs.sql"),
            include_str!("../migrations/0002_create_playlists.sql"),
            include_str!("../migrations/0003_create_playlist_songs.sql"),
        ];

        for migration in MIGRATIONS {
            sqlx::query(migration)
                .execute(pool)
                .await
                .map_err(|e| StorageError::Migration(e.to_string()))?;
        }

        Ok(())
    }

    fn song_from_row(row: &sqlx::sqlite::SqliteRow) -> Song {
        let duration_seconds: Option<i64> = row.get("duration_seconds");
        Song {
            id: SongId::new(row.get::<String, _>("id")),
            title: row.get("title"),
            artist: row.get("artist"),
            album: row.get("album"),
            genre: row.get("genre"),
            duration: duration_seconds
                .filter(|&s| s > 0)
                .map(|s| Duration::from_secs(s as u64)),
            file_path: PathBuf::from(row.get::<String, _>("file_path")),
            album_art: row.get("album_art"),
            track_number: row.get::<Option<i64>, _>("track_number").map(|n| n as u32),
            year: row.get::<Option<i64>, _>("year").map(|n| n as u32),
            lyrics: row.get("lyrics"),
        }
    }

    async fn playlist_songs(&self, id: &PlaylistId) -> sqlx::Result<Vec<Song>> {
        let rows = sqlx::query(
            r#"
            SELECT s.* FROM songs s
            JOIN playlist_songs ps ON s.id = ps.song_id
            WHERE ps.playlist_id = ?
            ORDER BY ps.position
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::song_from_row).collect())
    }
}

fn timestamp(dt: DateTime<Utc>) -> i64 {
    dt.timestamp()
}

fn datetime(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}

#[async_trait]
impl LibraryStore for SqliteLibraryStore {
    async fn save_song(&self, song: &Song) -> aria_core::Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO songs
            (id, title, artist, album, genre, duration_seconds, file_path,
             album_art, track_number, year, lyrics, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(song.id.as_str())
        .bind(&song.title)
        .bind(&song.artist)
        .bind(&song.album)
        .bind(&song.genre)
        .bind(song.duration.map(|d| d.as_secs() as i64))
        .bind(song.file_path.to_string_lossy().to_string())
        .bind(&song.album_art)
        .bind(song.track_number.map(i64::from))
        .bind(song.year.map(i64::from))
        .bind(&song.lyrics)
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| AriaError::storage(e.to_string()))?;

        Ok(())
    }

    async fn delete_song(&self, id: &SongId) -> aria_core::Result<()> {
        sqlx::query("DELETE FROM songs WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AriaError::storage(e.to_string()))?;

        Ok(())
    }

    async fn get_all_songs(&self) -> aria_core::Result<Vec<Song>> {
        let rows = sqlx::query("SELECT * FROM songs ORDER BY artist, album, track_number")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AriaError::storage(e.to_string()))?;

        Ok(rows.iter().map(Self::song_from_row).collect())
    }

    async fn save_playlist(&self, playlist: &Playlist) -> aria_core::Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AriaError::storage(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO playlists
            (id, name, description, created_at, modified_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(playlist.id.as_str())
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(timestamp(playlist.created_at))
        .bind(timestamp(playlist.modified_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| AriaError::storage(e.to_string()))?;

        // Replace the full ordered membership
        sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ?")
            .bind(playlist.id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| AriaError::storage(e.to_string()))?;

        for (position, song) in playlist.songs().iter().enumerate() {
            sqlx::query(
                "INSERT INTO playlist_songs (playlist_id, song_id, position) VALUES (?, ?, ?)",
            )
            .bind(playlist.id.as_str())
            .bind(song.id.as_str())
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| AriaError::storage(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| AriaError::storage(e.to_string()))?;

        Ok(())
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> aria_core::Result<()> {
        sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AriaError::storage(e.to_string()))?;

        Ok(())
    }

    async fn get_all_playlists(&self) -> aria_core::Result<Vec<Playlist>> {
        let rows = sqlx::query("SELECT * FROM playlists ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AriaError::storage(e.to_string()))?;

        let mut playlists = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = PlaylistId::new(row.get::<String, _>("id"));
            let songs = self
                .playlist_songs(&id)
                .await
                .map_err(|e| AriaError::storage(e.to_string()))?;

            playlists.push(Playlist::with_parts(
                id,
                row.get::<String, _>("name"),
                row.get("description"),
                songs,
                datetime(row.get("created_at")),
                datetime(row.get("modified_at")),
            ));
        }

        Ok(playlists)
    }

    async fn song_lyrics(&self, id: &SongId) -> aria_core::Result<Option<String>> {
        let row = sqlx::query("SELECT lyrics FROM songs WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AriaError::storage(e.to_string()))?;

        Ok(row.and_then(|r| r.get("lyrics")))
    }

    async fn update_song_lyrics(&self, id: &SongId, lyrics: &str) -> aria_core::Result<()> {
        sqlx::query("UPDATE songs SET lyrics = ? WHERE id = ?")
            .bind(lyrics)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AriaError::storage(e.to_string()))?;

        Ok(())
    }
}
