use chrono::{Duration, NaiveDate};

use super::super::domain::{ConsentWindow, Session, SessionStatus};

/// Derive a session's lifecycle status from its date list and closed flag.
/// The rules are an ordered list; the first match wins.
pub fn session_status(session: &Session, today: NaiveDate) -> SessionStatus {
    if session.closed {
        return SessionStatus::Closed;
    }
    let Some(last) = session.last_date() else {
        return SessionStatus::Unplanned;
    };
    if today > last {
        return SessionStatus::Completed;
    }
    SessionStatus::Planned
}

/// Where the session sits relative to its consent window. The window opens
/// `open_offset_days` before the first date and closes `close_offset_days`
/// before the last, so downstream code can tell whether a reply could
/// plausibly exist yet.
pub fn consent_window(session: &Session, today: NaiveDate) -> ConsentWindow {
    let (Some(first), Some(last)) = (session.first_date(), session.last_date()) else {
        return ConsentWindow::None;
    };

    let open_at = first - Duration::days(session.window.open_offset_days);
    let close_at = last - Duration::days(session.window.close_offset_days);

    if today < open_at {
        ConsentWindow::Opening
    } else if today <= close_at {
        ConsentWindow::Open
    } else {
        ConsentWindow::Closed
    }
}
