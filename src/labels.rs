/// Declares a closed set of labels stored as TEXT and sent as JSON strings.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(anyhow::anyhow!("unknown {} {:?}", stringify!($name), other)),
                }
            }
        }
    };
}

pub(crate) use string_enum;

#[cfg(test)]
mod tests {
    string_enum! {
        enum Shade {
            Light => "light",
            Dark => "Dark-Mode",
        }
    }

    #[test]
    fn text_and_serde_agree() {
        for shade in Shade::ALL {
            let json = serde_json::to_string(shade).unwrap();
            assert_eq!(json, format!("\"{}\"", shade.as_str()));
            assert_eq!(shade.as_str().parse::<Shade>().unwrap(), *shade);
        }
        assert!("dark".parse::<Shade>().is_err());
        assert_eq!(Shade::Dark.to_string(), "Dark-Mode");
    }
}
