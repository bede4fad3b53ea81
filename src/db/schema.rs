//! Database schema and migrations for Treehole.
//!
//! Migrations are applied in order when the database is opened; the
//! schema_version table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Holes. Owned by the post subsystem; favorites only join against it.
    r#"
CREATE TABLE holes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    division_id INTEGER NOT NULL DEFAULT 1,
    view        INTEGER NOT NULL DEFAULT 0,
    reply       INTEGER NOT NULL DEFAULT 0,
    hidden      INTEGER NOT NULL DEFAULT 0,
    locked      INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);

CREATE INDEX idx_holes_updated_at ON holes(updated_at);
"#,
    // v2: Favorite groups and memberships
    r#"
-- Group ids are per user; 0 is the default group and can never be deleted.
CREATE TABLE favorite_groups (
    user_id     INTEGER NOT NULL,
    id          INTEGER NOT NULL,
    name        TEXT NOT NULL,
    deleted     INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
    PRIMARY KEY (user_id, id)
);

-- A post sits in at most one group per user: UNIQUE (user_id, hole_id).
CREATE TABLE user_favorites (
    user_id             INTEGER NOT NULL,
    hole_id             INTEGER NOT NULL REFERENCES holes(id) ON DELETE CASCADE,
    favorite_group_id   INTEGER NOT NULL,
    position            INTEGER NOT NULL,
    created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
    PRIMARY KEY (user_id, hole_id, favorite_group_id),
    UNIQUE (user_id, hole_id),
    FOREIGN KEY (user_id, favorite_group_id) REFERENCES favorite_groups(user_id, id)
);

CREATE INDEX idx_user_favorites_group ON user_favorites(user_id, favorite_group_id, position);

CREATE TRIGGER trg_user_favorites_insert_active_group
BEFORE INSERT ON user_favorites
WHEN (SELECT deleted FROM favorite_groups
      WHERE user_id = NEW.user_id AND id = NEW.favorite_group_id) <> 0
BEGIN
    SELECT RAISE(ABORT, 'favorite group is deleted');
END;

CREATE TRIGGER trg_user_favorites_update_active_group
BEFORE UPDATE OF favorite_group_id ON user_favorites
WHEN (SELECT deleted FROM favorite_groups
      WHERE user_id = NEW.user_id AND id = NEW.favorite_group_id) <> 0
BEGIN
    SELECT RAISE(ABORT, 'favorite group is deleted');
END;

CREATE TRIGGER trg_favorite_groups_protect_default
BEFORE UPDATE OF deleted ON favorite_groups
WHEN NEW.deleted <> 0 AND OLD.id = 0
BEGIN
    SELECT RAISE(ABORT, 'default favorite group cannot be deleted');
END;

CREATE TRIGGER trg_favorite_groups_no_orphans
BEFORE UPDATE OF deleted ON favorite_groups
WHEN NEW.deleted <> 0 AND EXISTS (
    SELECT 1 FROM user_favorites
    WHERE user_id = OLD.user_id AND favorite_group_id = OLD.id
)
BEGIN
    SELECT RAISE(ABORT, 'favorite group still has members');
END;
"#,
];
