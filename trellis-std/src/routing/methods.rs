//! The HTTP verb table.
//!
//! [`for_each_verb!`] hands the full `name => "METHOD"` list to another
//! macro, so the per-verb registration methods on `Router` and `Route` and
//! the [`METHODS`] constant are all generated from one place.

macro_rules! for_each_verb {
    ($callback:ident) => {
        $callback! {
            get => "GET",
            post => "POST",
            put => "PUT",
            delete => "DELETE",
            patch => "PATCH",
            head => "HEAD",
            options => "OPTIONS",
            trace => "TRACE",
            connect => "CONNECT",
            checkout => "CHECKOUT",
            copy => "COPY",
            lock => "LOCK",
            merge => "MERGE",
            mkactivity => "MKACTIVITY",
            mkcol => "MKCOL",
            r#move => "MOVE",
            m_search => "M-SEARCH",
            notify => "NOTIFY",
            purge => "PURGE",
            report => "REPORT",
            search => "SEARCH",
            subscribe => "SUBSCRIBE",
            unlock => "UNLOCK",
            unsubscribe => "UNSUBSCRIBE",
        }
    };
}

pub(crate) use for_each_verb;

macro_rules! method_table {
    ($($name:ident => $verb:literal),* $(,)?) => {
        /// Every method with a dedicated registration function, upper-case.
        pub const METHODS: &[&str] = &[$($verb),*];
    };
}

for_each_verb!(method_table);

/// Returns `true` if `name` has a dedicated registration function.
pub fn is_known(name: &str) -> bool {
    METHODS.iter().any(|m| m.eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table() {
        assert_eq!(METHODS.len(), 24);
        assert!(is_known("get"));
        assert!(is_known(" m-search "));
        assert!(!is_known("brew"));
    }
}
