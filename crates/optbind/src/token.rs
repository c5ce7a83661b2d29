//! Classify raw tokens into options and positionals.

/// One token of the expanded argument stream, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `--flag`, `--flag=value`, `--flag:value`.
    Long { flag: &'a str, inline: &'a str },
    /// `-f`, `-fvalue`, `-f=value`, `-f:value`.
    Short { flag: &'a str, inline: &'a str },
    /// Three or more leading dashes.
    Malformed,
    /// Anything not starting with a dash, including the empty string.
    Positional,
}

impl<'a> Token<'a> {
    /// Flag spelling and inline value if this token is an option.
    pub fn option(&self) -> Option<(&'a str, &'a str)> {
        match *self {
            Token::Long { flag, inline } | Token::Short { flag, inline } => Some((flag, inline)),
            _ => None,
        }
    }
}

pub fn classify(arg: &str) -> Token<'_> {
    if arg.starts_with("---") {
        return Token::Malformed;
    }

    if let Some(body) = arg.strip_prefix("--") {
        // Split at the first '=', falling back to the first ':'
        let (flag, inline) = match body.find('=').or_else(|| body.find(':')) {
            Some(pos) => (&arg[..pos + 2], &body[pos + 1..]),
            None => (arg, ""),
        };
        return Token::Long {
            flag: flag.trim(),
            inline,
        };
    }

    if let Some(rest) = arg.strip_prefix('-') {
        // The flag is the dash plus exactly one character, whatever follows
        let split = rest.chars().next().map_or(0, char::len_utf8) + 1;
        let (flag, inline) = arg.split_at(split);
        let inline = inline
            .strip_prefix('=')
            .or_else(|| inline.strip_prefix(':'))
            .unwrap_or(inline);
        return Token::Short { flag, inline };
    }

    Token::Positional
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_forms() {
        assert_eq!(classify("--int32"), Token::Long { flag: "--int32", inline: "" });
        assert_eq!(classify("--int32=10"), Token::Long { flag: "--int32", inline: "10" });
        assert_eq!(classify("--int32:10"), Token::Long { flag: "--int32", inline: "10" });
        assert_eq!(classify("--define:a=b"), Token::Long { flag: "--define:a", inline: "b" });
        assert_eq!(classify("--name="), Token::Long { flag: "--name", inline: "" });
    }

    #[test]
    fn short_forms() {
        assert_eq!(classify("-t"), Token::Short { flag: "-t", inline: "" });
        assert_eq!(classify("-t10"), Token::Short { flag: "-t", inline: "10" });
        assert_eq!(classify("-t=10"), Token::Short { flag: "-t", inline: "10" });
        assert_eq!(classify("-t:=10"), Token::Short { flag: "-t", inline: "=10" });
        assert_eq!(classify("-é1"), Token::Short { flag: "-é", inline: "1" });
    }

    #[test]
    fn lone_dash_attempts_short_option() {
        assert_eq!(classify("-"), Token::Short { flag: "-", inline: "" });
    }

    #[test]
    fn three_dashes_are_malformed() {
        assert_eq!(classify("---"), Token::Malformed);
        assert_eq!(classify("----x=1"), Token::Malformed);
    }

    #[test]
    fn positionals() {
        assert_eq!(classify(""), Token::Positional);
        assert_eq!(classify("file.txt"), Token::Positional);
        assert_eq!(classify("a-b"), Token::Positional);
    }
}
