pub fn take_last_n_chars(string: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    let start = string
        .char_indices()
        .rev()
        .nth(n - 1)
        .map_or(0, |(idx, _)| idx);
    &string[start..]
}

/// Declares an opaque identifier handed out by the server.
macro_rules! newtype {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Eq,
            PartialOrd,
            Ord,
            PartialEq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl $name {
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

pub(crate) use newtype;
