/// used for easily creating string tagged types
macro_rules! tagged_type {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$id_attr:meta])*
                $var:ident = $val:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        $vis enum $name {
            $(
                $(#[$id_attr])*
                $var,
            )*
        }

        impl $name {
            /// Gets the tag as it appears on the wire
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(
                    $name::$var => $val,
                    )*
                }
            }
        }

        impl From<$name> for &'static str {
            fn from(var: $name) -> Self {
                var.as_str()
            }
        }

        impl TryFrom<&str> for $name {
            type Error = $crate::UnknownTagError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let tag = match value {
                    $(
                    $val => $name::$var,
                    )*
                    unknown => return Err($crate::UnknownTagError(unknown.to_string()))
                };
                Ok(tag)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <std::string::String as serde::Deserialize>::deserialize(deserializer)?;
                $name::try_from(raw.as_str()).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use tagged_type;
