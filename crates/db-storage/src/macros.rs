// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

/// Allows to create one or more typed ids
///
/// Defines the type and implements a variety of traits for it to be usable with diesel.
/// See <https://stackoverflow.com/a/59948116> for more information.
#[macro_export]
macro_rules! diesel_newtype {
    ($($(#[$meta:meta])* $name:ident($to_wrap:ty) => $sql_type:ty),+ $(,)?) => {
        $(
            pub use __newtype_impl::$name;
        )+

        mod __newtype_impl {
            use diesel::deserialize::{self, FromSql, FromSqlRow};
            use diesel::expression::AsExpression;
            use diesel::pg::{Pg, PgValue};
            use diesel::serialize::{self, Output, ToSql};
            use serde::{Deserialize, Serialize};
            use std::fmt;

            $(

            #[derive(
                Debug,
                Clone,
                PartialEq,
                Eq,
                PartialOrd,
                Ord,
                Hash,
                Serialize,
                Deserialize,
                AsExpression,
                FromSqlRow,
            )]
            $(#[$meta])*
            #[diesel(sql_type = $sql_type)]
            pub struct $name($to_wrap);

            impl $name {
                pub const fn from(inner: $to_wrap) -> Self {
                    Self(inner)
                }

                pub fn inner(&self) -> &$to_wrap {
                    &self.0
                }

                pub fn into_inner(self) -> $to_wrap {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }

            impl ToSql<$sql_type, Pg> for $name
            where
                $to_wrap: ToSql<$sql_type, Pg>,
            {
                fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                    <$to_wrap as ToSql<$sql_type, Pg>>::to_sql(&self.0, out)
                }
            }

            impl FromSql<$sql_type, Pg> for $name
            where
                $to_wrap: FromSql<$sql_type, Pg>,
            {
                fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
                    <$to_wrap as FromSql<$sql_type, Pg>>::from_sql(bytes).map(Self)
                }
            }

            )+
        }
    };
}

/// Creates an enum which is mapped to a postgres enum type
///
/// Implements the diesel `ToSql`/`FromSql` traits for the given SQL type
/// representation, mapping each variant to its database value.
#[macro_export]
macro_rules! sql_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident,
        $sql_type_name:literal,
        $sql_type_ident:ident,
        {
            $($variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
        #[diesel(postgres_type(name = $sql_type_name))]
        pub struct $sql_type_ident;

        $(#[$enum_meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            diesel::expression::AsExpression,
            diesel::deserialize::FromSqlRow,
        )]
        #[diesel(sql_type = $sql_type_ident)]
        pub enum $enum_name {
            $($variant,)+
        }

        impl diesel::serialize::ToSql<$sql_type_ident, diesel::pg::Pg> for $enum_name {
            fn to_sql<'b>(
                &'b self,
                out: &mut diesel::serialize::Output<'b, '_, diesel::pg::Pg>,
            ) -> diesel::serialize::Result {
                use std::io::Write as _;

                match self {
                    $(Self::$variant => out.write_all($value)?,)+
                }

                Ok(diesel::serialize::IsNull::No)
            }
        }

        impl diesel::deserialize::FromSql<$sql_type_ident, diesel::pg::Pg> for $enum_name {
            fn from_sql(bytes: diesel::pg::PgValue<'_>) -> diesel::deserialize::Result<Self> {
                match bytes.as_bytes() {
                    $($value => Ok(Self::$variant),)+
                    _ => Err("unrecognized enum variant".into()),
                }
            }
        }
    };
}
