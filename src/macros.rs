/// Macro for continuing on errors
/// ```
/// # use git_netlog::macros::ok_or_continue;
/// # use git_netlog::parse_commits;
/// let inputs = [
///     "Mode =\nstat\ncommit 1111111111111111111111111111111111111111\n",
///     "not a log",
///     "Mode =\nbasic\ncommit 2222222222222222222222222222222222222222\n",
/// ];
///
/// // The second input has no header and is skipped.
/// let mut commits = 0;
/// for input in inputs {
///     commits += ok_or_continue!(parse_commits(input)).len();
/// }
///
/// assert_eq!(commits, 2);
/// ```
#[doc(hidden)] #[macro_export]
macro_rules! __ok_or_continue {
    ($res:expr) => {
        match $res {
            Ok(v) => v,
            Err(e) => {
                log::warn!("An error: {}, skipped.", e);
                continue;
            },
        }
    };
}

/// Macro for continuing on errors
/// ```
/// # use git_netlog::macros::ok_or_continue;
/// # use git_netlog::LogMode;
/// let mut modes = Vec::new();
/// for name in ["stat", "patch", "raw"] {
///     modes.push(ok_or_continue!(name.parse::<LogMode>()));
/// }
///
/// assert_eq!(modes, [LogMode::Stat, LogMode::Raw]);
/// ```
#[doc(inline)]
pub use crate::__ok_or_continue as ok_or_continue;


/// Allows clap to use enum variants as variants in CLI.
/// The enum needs an `iter()` over its variants plus `Display` and `FromStr`
/// that agree with each other, like [`crate::LogMode`].
#[doc(hidden)] #[macro_export]
macro_rules! __clap_enum_variants {
    ($e: ty) => {{
        use clap::builder::TypedValueParser;
        clap::builder::PossibleValuesParser::new(
            <$e>::iter()
                .map(|v| {
                    v.to_string()
                })
                .collect::<Vec<String>>()
        )
        .map(|s| s.parse::<$e>().unwrap())
    }};
}

#[doc(inline)]
pub use crate::__clap_enum_variants as clap_enum_variants;
