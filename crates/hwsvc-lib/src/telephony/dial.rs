//! Dial-string normalization for CDMA.

/// Pause: wait a fixed interval before sending the following digits.
pub const PAUSE: char = ',';
/// Wait: hold the following digits until the user confirms.
pub const WAIT: char = ';';
/// Wildcard digit.
pub const WILD: char = 'N';

fn is_dialable(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '*' | '#' | '+' | WILD | PAUSE | WAIT)
}

fn is_pause_or_wait(c: char) -> bool {
    c == PAUSE || c == WAIT
}

/// Drop everything that is not a dialable character or a pause/wait.
pub fn strip_separators(dial_string: &str) -> String {
    dial_string.chars().filter(|&c| is_dialable(c)).collect()
}

/// Collapse each run of pause/wait characters into one: [`WAIT`] if the
/// run contains a wait, otherwise [`PAUSE`]. Trailing pause/wait is dropped.
pub fn format_dial_string(dial_string: &str) -> String {
    let mut out = String::with_capacity(dial_string.len());
    let mut run: Option<char> = None;
    for c in dial_string.chars() {
        if is_pause_or_wait(c) {
            run = Some(match run {
                Some(WAIT) => WAIT,
                _ => c,
            });
            continue;
        }
        if let Some(sep) = run.take() {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

/// [`strip_separators`] followed by [`format_dial_string`].
pub fn normalize(dial_string: &str) -> String {
    format_dial_string(&strip_separators(dial_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_removes_formatting() {
        assert_eq!(strip_separators("(555) 123-4567"), "5551234567");
        assert_eq!(strip_separators("+1 555.123.4567"), "+15551234567");
        assert_eq!(strip_separators("*72#N"), "*72#N");
    }

    #[test]
    fn strip_keeps_pause_and_wait() {
        assert_eq!(strip_separators("555-1234, 99;1"), "5551234,99;1");
    }

    #[test]
    fn single_separators_unchanged() {
        assert_eq!(format_dial_string("5551234,99;1"), "5551234,99;1");
    }

    #[test]
    fn pause_run_collapses_to_pause() {
        assert_eq!(format_dial_string("123,,,456"), "123,456");
    }

    #[test]
    fn mixed_run_collapses_to_wait() {
        assert_eq!(format_dial_string("123,;,456"), "123;456");
        assert_eq!(format_dial_string("123;,,456"), "123;456");
    }

    #[test]
    fn trailing_separators_dropped() {
        assert_eq!(format_dial_string("123,;"), "123");
        assert_eq!(format_dial_string(",,"), "");
    }

    #[test]
    fn leading_separator_kept() {
        assert_eq!(format_dial_string(",123"), ",123");
    }

    #[test]
    fn normalize_end_to_end() {
        assert_eq!(normalize("800 555-0199 ,, ; 1234 ,"), "8005550199;1234");
    }
}
