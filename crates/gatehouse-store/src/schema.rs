//! Auth database schema.
//!
//! The same DDL ships as sqlx migrations under `migrations/`; these consts
//! exist for embedded setup in tools and ad-hoc environments.

/// SQL to create the users table.
pub const CREATE_USERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id               UUID PRIMARY KEY,
    version          BIGINT NOT NULL,
    created_at       TIMESTAMPTZ NOT NULL,
    created_by       UUID,
    last_modified_at TIMESTAMPTZ,
    last_modified_by UUID,
    email            VARCHAR(254) NOT NULL UNIQUE,
    username         VARCHAR(50) NOT NULL UNIQUE,
    display_name     VARCHAR(100) NOT NULL,
    status           VARCHAR(20) NOT NULL
);
";

/// SQL to create the user groups table.
pub const CREATE_USER_GROUPS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS user_groups (
    id               UUID PRIMARY KEY,
    version          BIGINT NOT NULL,
    created_at       TIMESTAMPTZ NOT NULL,
    created_by       UUID,
    last_modified_at TIMESTAMPTZ,
    last_modified_by UUID,
    name             VARCHAR(100) NOT NULL UNIQUE,
    description      VARCHAR(500)
);
";

/// SQL to create the roles table.
pub const CREATE_ROLES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS roles (
    id               UUID PRIMARY KEY,
    version          BIGINT NOT NULL,
    created_at       TIMESTAMPTZ NOT NULL,
    created_by       UUID,
    last_modified_at TIMESTAMPTZ,
    last_modified_by UUID,
    code             VARCHAR(50) NOT NULL UNIQUE,
    name             VARCHAR(100) NOT NULL,
    description      VARCHAR(500)
);
";

/// SQL to create the group membership junction table.
pub const CREATE_USER_GROUP_MEMBERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS user_group_members (
    group_id UUID NOT NULL REFERENCES user_groups (id),
    user_id  UUID NOT NULL REFERENCES users (id),
    added_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (group_id, user_id)
);
";
