//! SQL query constants
//!
//! Contains all SQL queries used by the application. Enum columns are read
//! as text and numeric amounts as float8 so that rows map onto plain Rust
//! types.

/// Columns selected for a proposal row
macro_rules! proposal_columns {
    () => {
        r#"id,
        COALESCE(title, '') AS title,
        status::text AS status,
        COALESCE(created_at, 'epoch'::timestamptz) AS created_at,
        estimated_value::float8 AS estimated_value,
        actual_value::float8 AS actual_value,
        completion_date"#
    };
}

/// Columns selected for an earning row
macro_rules! earning_columns {
    () => {
        r#"id,
        amount::float8 AS amount,
        status::text AS status,
        created_at,
        description,
        proposal_id,
        payment_date"#
    };
}

/// Proposals owned by a user, newest first; `$2` optionally filters by status
pub const LIST_PROPOSALS: &str = concat!(
    "SELECT ",
    proposal_columns!(),
    r#"
    FROM proposals
    WHERE user_id = $1
        AND ($2::text IS NULL OR status::text = $2::text)
    ORDER BY created_at DESC NULLS LAST"#
);

/// Partial update of a proposal; NULL parameters keep the stored value
pub const UPDATE_PROPOSAL: &str = concat!(
    r#"UPDATE proposals SET
        status = COALESCE($3::text::proposal_status, status),
        estimated_value = COALESCE($4::float8::numeric, estimated_value),
        actual_value = COALESCE($5::float8::numeric, actual_value),
        completion_date = COALESCE($6::timestamptz, completion_date)
    WHERE id = $1 AND user_id = $2
    RETURNING "#,
    proposal_columns!()
);

/// Earnings owned by a user, newest first
pub const LIST_EARNINGS: &str = concat!(
    "SELECT ",
    earning_columns!(),
    r#"
    FROM earnings
    WHERE user_id = $1
    ORDER BY created_at DESC"#
);

/// Record a new earning
pub const INSERT_EARNING: &str = concat!(
    r#"INSERT INTO earnings (user_id, amount, description, proposal_id, status)
    VALUES ($1, $2::float8::numeric, $3, $4, $5::text::earning_status)
    RETURNING "#,
    earning_columns!()
);

/// Change an earning's status; moving to paid stamps the payment date
/// unless one is given or already stored
pub const UPDATE_EARNING_STATUS: &str = concat!(
    r#"UPDATE earnings SET
        status = $3::text::earning_status,
        payment_date = CASE
            WHEN $3::text = 'paid' THEN COALESCE($4::timestamptz, payment_date, now())
            ELSE payment_date
        END,
        updated_at = now()
    WHERE id = $1 AND user_id = $2
    RETURNING "#,
    earning_columns!()
);

/// Messages involving a user with both participants' profiles, newest first
pub const LIST_CONVERSATION_MESSAGES: &str = r#"
    SELECT
        m.sender_id,
        m.receiver_id,
        s.id AS sender_profile_id,
        s.full_name AS sender_full_name,
        s.avatar_url AS sender_avatar_url,
        r.id AS receiver_profile_id,
        r.full_name AS receiver_full_name,
        r.avatar_url AS receiver_avatar_url
    FROM messages m
        LEFT JOIN profiles s ON s.id = m.sender_id
        LEFT JOIN profiles r ON r.id = m.receiver_id
    WHERE m.sender_id = $1 OR m.receiver_id = $1
    ORDER BY m.sent_at DESC NULLS LAST
"#;

/// Columns selected for a message row
macro_rules! message_columns {
    () => {
        r#"id, sender_id, receiver_id, job_id, proposal_id, content, file_url, sent_at"#
    };
}

/// Messages exchanged between two users, oldest first
pub const LIST_THREAD: &str = concat!(
    "SELECT ",
    message_columns!(),
    r#"
    FROM messages
    WHERE (sender_id = $1 AND receiver_id = $2)
        OR (sender_id = $2 AND receiver_id = $1)
    ORDER BY sent_at ASC NULLS FIRST"#
);

/// Display name of a profile; no row when the profile does not exist
pub const PROFILE_FULL_NAME: &str = "SELECT full_name FROM profiles WHERE id = $1";

/// Send a message
pub const INSERT_MESSAGE: &str = concat!(
    r#"INSERT INTO messages (sender_id, receiver_id, content, job_id, proposal_id)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING "#,
    message_columns!()
);

/// Notify a user
pub const INSERT_NOTIFICATION: &str = r#"
    INSERT INTO notifications (user_id, type, content)
    VALUES ($1, $2, $3)
"#;

/// A user's notifications, newest first
pub const LIST_NOTIFICATIONS: &str = r#"
    SELECT id, user_id, type, content, COALESCE(is_read, false) AS is_read, created_at
    FROM notifications
    WHERE user_id = $1
    ORDER BY created_at DESC NULLS LAST
"#;

/// Mark all of a user's unread notifications as read
pub const MARK_NOTIFICATIONS_READ: &str = r#"
    UPDATE notifications SET is_read = true, updated_at = now()
    WHERE user_id = $1 AND is_read IS NOT TRUE
"#;

/// Platform-wide totals for the admin dashboard
pub const PLATFORM_STATS: &str = r#"
    SELECT
        (SELECT COUNT(*) FROM profiles) AS users,
        (SELECT COUNT(*) FROM jobs) AS jobs,
        (SELECT COUNT(*) FROM job_applications) AS applications,
        (SELECT COUNT(*) FROM jobs WHERE status = 'completed') AS completed_jobs,
        (SELECT COALESCE(SUM(amount), 0)::float8 FROM earnings) AS earnings
"#;

/// Development schema mirroring the hosted tables this service reads.
/// Production schemas are managed by the hosting platform.
pub const BOOTSTRAP_SCHEMA: &str = r#"
    DO $$ BEGIN
        CREATE TYPE proposal_status AS ENUM ('draft', 'pending', 'approved', 'rejected', 'completed');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$;

    DO $$ BEGIN
        CREATE TYPE earning_status AS ENUM ('pending', 'paid', 'cancelled');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$;

    CREATE TABLE IF NOT EXISTS profiles (
        id UUID PRIMARY KEY,
        full_name TEXT,
        avatar_url TEXT,
        created_at TIMESTAMPTZ DEFAULT now()
    );

    CREATE TABLE IF NOT EXISTS jobs (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        posted_by UUID REFERENCES profiles(id),
        status TEXT,
        created_at TIMESTAMPTZ DEFAULT now()
    );

    CREATE TABLE IF NOT EXISTS job_applications (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        job_id UUID REFERENCES jobs(id) ON DELETE CASCADE,
        applicant_id UUID REFERENCES profiles(id),
        status TEXT,
        created_at TIMESTAMPTZ DEFAULT now()
    );

    CREATE TABLE IF NOT EXISTS proposals (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID REFERENCES profiles(id),
        title TEXT NOT NULL,
        initial_prompt TEXT NOT NULL DEFAULT '',
        generated_content JSONB NOT NULL DEFAULT '{}'::jsonb,
        status proposal_status NOT NULL DEFAULT 'draft',
        estimated_value NUMERIC,
        actual_value NUMERIC,
        completion_date TIMESTAMPTZ,
        created_at TIMESTAMPTZ DEFAULT now()
    );

    CREATE TABLE IF NOT EXISTS earnings (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID NOT NULL REFERENCES profiles(id),
        proposal_id UUID REFERENCES proposals(id) ON DELETE SET NULL,
        amount NUMERIC NOT NULL CHECK (amount >= 0),
        status earning_status NOT NULL DEFAULT 'pending',
        description TEXT,
        payment_date TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );

    CREATE TABLE IF NOT EXISTS messages (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        sender_id UUID REFERENCES profiles(id),
        receiver_id UUID REFERENCES profiles(id),
        job_id UUID REFERENCES jobs(id),
        proposal_id UUID REFERENCES proposals(id),
        content TEXT,
        file_url TEXT,
        sent_at TIMESTAMPTZ DEFAULT now()
    );

    ALTER TABLE messages ADD COLUMN IF NOT EXISTS file_url TEXT;

    CREATE TABLE IF NOT EXISTS notifications (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
        type TEXT NOT NULL,
        content TEXT NOT NULL,
        is_read BOOLEAN DEFAULT false,
        created_at TIMESTAMPTZ DEFAULT now(),
        updated_at TIMESTAMPTZ DEFAULT now()
    );

    CREATE INDEX IF NOT EXISTS idx_proposals_user_id ON proposals(user_id);
    CREATE INDEX IF NOT EXISTS idx_earnings_user_id ON earnings(user_id);
    CREATE INDEX IF NOT EXISTS idx_messages_sender_id ON messages(sender_id);
    CREATE INDEX IF NOT EXISTS idx_messages_receiver_id ON messages(receiver_id);
    CREATE INDEX IF NOT EXISTS idx_notifications_user_id ON notifications(user_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_scope_rows_to_owner() {
        for query in [
            LIST_PROPOSALS,
            UPDATE_PROPOSAL,
            LIST_EARNINGS,
            UPDATE_EARNING_STATUS,
            LIST_NOTIFICATIONS,
            MARK_NOTIFICATIONS_READ,
        ] {
            assert!(query.contains("user_id = $"), "unscoped query: {}", query);
        }
    }

    #[test]
    fn test_thread_matches_both_directions() {
        assert!(LIST_THREAD.contains("(sender_id = $1 AND receiver_id = $2)"));
        assert!(LIST_THREAD.contains("(sender_id = $2 AND receiver_id = $1)"));
        assert!(INSERT_MESSAGE.ends_with("sent_at"));
    }

    #[test]
    fn test_bootstrap_creates_notifications() {
        assert!(BOOTSTRAP_SCHEMA.contains("CREATE TABLE IF NOT EXISTS notifications"));
        assert!(BOOTSTRAP_SCHEMA.contains("file_url TEXT"));
    }

    #[test]
    fn test_returning_clauses_match_selects() {
        assert!(UPDATE_PROPOSAL.contains("status::text AS status"));
        assert!(INSERT_EARNING.contains("amount::float8 AS amount"));
        assert!(UPDATE_EARNING_STATUS.ends_with("payment_date"));
    }

    #[test]
    fn test_paid_keeps_stored_payment_date() {
        assert!(UPDATE_EARNING_STATUS
            .contains("COALESCE($4::timestamptz, payment_date, now())"));
    }
}
