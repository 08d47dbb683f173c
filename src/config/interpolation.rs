use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

/// How many nested `%(name)s` references are followed before giving up.
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// `reference` is neither an option of the section nor a substitution.
    MissingOption { option: String, reference: String },
    Syntax { option: String, message: String },
    DepthExceeded { option: String, raw: String },
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InterpolationError::MissingOption { option, reference } => write!(
                f,
                "'{option}' refers to '%({reference})s', which is not defined"
            ),
            InterpolationError::Syntax { option, message } => {
                write!(f, "bad interpolation in '{option}': {message}")
            }
            InterpolationError::DepthExceeded { option, raw } => write!(
                f,
                "'{option}' exceeds {MAX_INTERPOLATION_DEPTH} levels of interpolation: {raw}"
            ),
        }
    }
}

impl core::error::Error for InterpolationError {}

/// Expand `%(name)s` references and `%%` escapes in `raw`, the value of
/// `option`. Referenced values are looked up through `lookup` and expanded in
/// turn.
pub fn interpolate<'a>(
    lookup: &dyn Fn(&str) -> Option<&'a str>,
    option: &str,
    raw: &str,
) -> Result<String, InterpolationError> {
    let mut accum = String::new();
    interpolate_some(lookup, option, raw, &mut accum, raw, 1)?;
    Ok(accum)
}

fn interpolate_some<'a>(
    lookup: &dyn Fn(&str) -> Option<&'a str>,
    option: &str,
    raw: &str,
    accum: &mut String,
    mut rest: &str,
    depth: usize,
) -> Result<(), InterpolationError> {
    if depth > MAX_INTERPOLATION_DEPTH {
        return Err(InterpolationError::DepthExceeded {
            option: option.to_string(),
            raw: raw.to_string(),
        });
    }

    while let Some(pos) = rest.find('%') {
        accum.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let syntax = |message: String| InterpolationError::Syntax {
            option: option.to_string(),
            message,
        };

        match rest.as_bytes().get(1) {
            Some(b'%') => {
                accum.push('%');
                rest = &rest[2..];
            }
            Some(b'(') => {
                let close = rest
                    .find(')')
                    .ok_or_else(|| syntax(format!("unterminated reference: {rest:?}")))?;
                if rest.as_bytes().get(close + 1) != Some(&b's') || close == 2 {
                    return Err(syntax(format!("bad reference: {rest:?}")));
                }
                let name = &rest[2..close];
                rest = &rest[close + 2..];

                let value = lookup(name).ok_or_else(|| InterpolationError::MissingOption {
                    option: option.to_string(),
                    reference: name.to_string(),
                })?;

                if value.contains('%') {
                    interpolate_some(lookup, option, raw, accum, value, depth + 1)?;
                } else {
                    accum.push_str(value);
                }
            }
            _ => {
                return Err(syntax(format!(
                    "'%' must be followed by '%' or '(', found: {rest:?}"
                )));
            }
        }
    }

    accum.push_str(rest);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<&'static str> {
        match name {
            "toolchain" => Some("/opt/llvm"),
            "cc" => Some("%(toolchain)s/bin/clang"),
            "loop" => Some("%(loop)s"),
            _ => None,
        }
    }

    #[test]
    fn test_plain_value() {
        assert_eq!(interpolate(&lookup, "x", "plain").unwrap(), "plain");
    }

    #[test]
    fn test_reference() {
        assert_eq!(
            interpolate(&lookup, "x", "--prefix=%(toolchain)s").unwrap(),
            "--prefix=/opt/llvm"
        );
    }

    #[test]
    fn test_nested_reference() {
        assert_eq!(
            interpolate(&lookup, "x", "%(cc)s -v").unwrap(),
            "/opt/llvm/bin/clang -v"
        );
    }

    #[test]
    fn test_escaped_percent() {
        assert_eq!(interpolate(&lookup, "x", "100%% done").unwrap(), "100% done");
    }

    #[test]
    fn test_missing_reference() {
        let err = interpolate(&lookup, "x", "a %(missing)s b").unwrap_err();
        assert_eq!(
            err,
            InterpolationError::MissingOption {
                option: "x".into(),
                reference: "missing".into()
            }
        );
    }

    #[test]
    fn test_bad_syntax() {
        assert!(matches!(
            interpolate(&lookup, "x", "50%").unwrap_err(),
            InterpolationError::Syntax { .. }
        ));
        assert!(matches!(
            interpolate(&lookup, "x", "%(toolchain)d").unwrap_err(),
            InterpolationError::Syntax { .. }
        ));
        assert!(matches!(
            interpolate(&lookup, "x", "%(toolchain").unwrap_err(),
            InterpolationError::Syntax { .. }
        ));
        assert!(matches!(
            interpolate(&lookup, "x", "%()s").unwrap_err(),
            InterpolationError::Syntax { .. }
        ));
    }

    #[test]
    fn test_depth_exceeded() {
        assert!(matches!(
            interpolate(&lookup, "x", "%(loop)s").unwrap_err(),
            InterpolationError::DepthExceeded { .. }
        ));
    }
}
