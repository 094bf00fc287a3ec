/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash, date_joined)
    VALUES ($1, $2, $3, $4)
    RETURNING id, username, email, password_hash, date_joined
"#;

/// 사용자 이름으로 조회
pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, date_joined FROM users WHERE username = $1";

/// 세션 생성
pub const INSERT_SESSION: &str =
    "INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)";

/// 유효한 세션의 사용자 조회
pub const GET_SESSION_USER: &str = r#"
    SELECT u.id, u.username, u.email, u.password_hash, u.date_joined
    FROM sessions s
    JOIN users u ON u.id = s.user_id
    WHERE s.id = $1 AND s.expires_at > $2
"#;

/// 세션 조회
pub const GET_SESSION: &str =
    "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = $1";

/// 세션 삭제
pub const DELETE_SESSION: &str = "DELETE FROM sessions WHERE id = $1";

/// 만료된 세션 삭제
pub const DELETE_EXPIRED_SESSIONS: &str = "DELETE FROM sessions WHERE expires_at <= $1";
