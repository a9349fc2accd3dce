//! Answer normalization so `r/Aww`, `/r/aww/` and `https://www.reddit.com/r/aww` all compare equal.

/// Canonicalize a subreddit name or link typed by a player.
///
/// Steps, in order: trim and lowercase; drop an `http(s)://` + optional `www.` +
/// `reddit.com/` prefix; drop a leading `/r/` or `r/`; strip leading and trailing slashes.
pub fn normalize_subreddit_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut s = lowered.as_str();

    let without_scheme = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
        .unwrap_or(s);
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    if let Some(rest) = without_www.strip_prefix("reddit.com/") {
        s = rest;
    }

    if let Some(rest) = s.strip_prefix("/r/").or_else(|| s.strip_prefix("r/")) {
        s = rest;
    }

    s.trim_matches('/').to_string()
}

/// Compare a guess with an answer after normalizing both.
pub fn answers_match(guess: &str, answer: &str) -> bool {
    let guess = normalize_subreddit_name(guess);
    !guess.is_empty() && guess == normalize_subreddit_name(answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_names() {
        assert_eq!(normalize_subreddit_name("aww"), "aww");
        assert_eq!(normalize_subreddit_name("  Aww  "), "aww");
    }

    #[test]
    fn subreddit_prefixes() {
        assert_eq!(normalize_subreddit_name("r/aww"), "aww");
        assert_eq!(normalize_subreddit_name("/r/aww"), "aww");
    }

    #[test]
    fn full_urls() {
        assert_eq!(normalize_subreddit_name("https://www.reddit.com/r/aww"), "aww");
        assert_eq!(normalize_subreddit_name("http://reddit.com/r/aww"), "aww");
        assert_eq!(normalize_subreddit_name("reddit.com/r/aww"), "aww");
    }

    #[test]
    fn surrounding_slashes() {
        assert_eq!(normalize_subreddit_name("aww/"), "aww");
        assert_eq!(normalize_subreddit_name("/aww/"), "aww");
        assert_eq!(normalize_subreddit_name("r/aww/"), "aww");
    }

    #[test]
    fn combined() {
        assert_eq!(normalize_subreddit_name("  https://reddit.com/r/Aww/  "), "aww");
    }

    #[test]
    fn www_without_reddit_host_is_kept() {
        // Only a reddit.com host is stripped.
        assert_eq!(normalize_subreddit_name("www.example.com"), "www.example.com");
    }

    #[test]
    fn matching() {
        assert!(answers_match(" R/AskReddit ", "askreddit"));
        assert!(!answers_match("ask", "askreddit"));
        assert!(!answers_match("   ", ""));
    }
}
