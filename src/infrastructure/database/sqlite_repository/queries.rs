pub(super) const TABLE_EXISTS: &str = r#"
    SELECT COUNT(*)
    FROM sqlite_master
    WHERE type = 'table' AND name = 'cached_feeds'
"#;

pub(super) const SELECT_COLUMN_NAMES: &str = r#"
    SELECT name
    FROM pragma_table_info('cached_feeds')
    ORDER BY cid
"#;

pub(super) const DROP_CACHED_FEEDS_TABLE: &str = r#"
    DROP TABLE IF EXISTS cached_feeds
"#;

pub(super) const CREATE_CACHED_FEEDS_TABLE: &str = r#"
    CREATE TABLE cached_feeds (
        id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
        href VARCHAR(255),
        title VARCHAR(255),
        link VARCHAR(255),
        feed_data_type VARCHAR(255),
        feed_data TEXT,
        http_headers TEXT,
        serialized TEXT,
        last_retrieved DATETIME,
        time_to_live INTEGER
    )
"#;

pub(super) const INSERT_CACHED_FEED: &str = r#"
    INSERT INTO cached_feeds (
        href,
        title,
        link,
        feed_data,
        feed_data_type,
        http_headers,
        serialized,
        last_retrieved,
        time_to_live
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

pub(super) const UPDATE_CACHED_FEED: &str = r#"
    UPDATE cached_feeds
    SET href = ?2,
        title = ?3,
        link = ?4,
        feed_data = ?5,
        feed_data_type = ?6,
        http_headers = ?7,
        serialized = ?8,
        last_retrieved = ?9,
        time_to_live = ?10
    WHERE id = ?1
"#;

pub(super) const SELECT_CACHED_FEED_BY_ID: &str = r#"
    SELECT id,
           href,
           title,
           link,
           feed_data,
           feed_data_type,
           http_headers,
           serialized,
           last_retrieved,
           time_to_live
    FROM cached_feeds
    WHERE id = ?1
"#;

pub(super) const SELECT_CACHED_FEED_BY_HREF: &str = r#"
    SELECT id,
           href,
           title,
           link,
           feed_data,
           feed_data_type,
           http_headers,
           serialized,
           last_retrieved,
           time_to_live
    FROM cached_feeds
    WHERE href = ?1
    ORDER BY id ASC
    LIMIT 1
"#;

pub(super) const DELETE_CACHED_FEED_BY_ID: &str = r#"
    DELETE FROM cached_feeds
    WHERE id = ?1
"#;

pub(super) const DELETE_CACHED_FEEDS_BY_HREF: &str = r#"
    DELETE FROM cached_feeds
    WHERE href = ?1
"#;

pub(super) const COUNT_CACHED_FEEDS: &str = r#"
    SELECT COUNT(*)
    FROM cached_feeds
"#;
