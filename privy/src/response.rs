use std::convert::Infallible;

use privy_core::MessageBuilder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotResponse {
    /// a PRIVMSG back to wherever the command came from
    Message(String),
    /// a NOTICE to the sender only
    Notice(String),
    Raw(MessageBuilder<'static>),
    Join(String),
    Part(String),
    Shutdown,
    Many(Vec<Self>),
}

pub trait IntoResponse {
    fn into_response(self) -> Option<BotResponse>;
}

macro_rules! impl_tuple {
    ($([$ty:ident, $num:tt]),+) => {
        impl<$($ty),+> IntoResponse for ($($ty),+)
        where
            $($ty: IntoResponse),+,
        {
            fn into_response(self) -> Option<BotResponse> {
                Some(BotResponse::Many(
                    [$(self.$num.into_response(),)+].into_iter().flatten().collect()
                ))
            }
        }
    };
}

impl_tuple! {[T1, 0], [T2, 1]}
impl_tuple! {[T1, 0], [T2, 1], [T3, 2]}
impl_tuple! {[T1, 0], [T2, 1], [T3, 2], [T4, 3]}

impl IntoResponse for BotResponse {
    fn into_response(self) -> Option<BotResponse> {
        Some(self)
    }
}

impl IntoResponse for () {
    fn into_response(self) -> Option<BotResponse> {
        None
    }
}

impl<T: IntoResponse> IntoResponse for Option<T> {
    fn into_response(self) -> Option<BotResponse> {
        self.and_then(IntoResponse::into_response)
    }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Option<BotResponse> {
        match self {
            Ok(o) => o.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

impl IntoResponse for Infallible {
    fn into_response(self) -> Option<BotResponse> {
        match self {}
    }
}

impl<T: IntoResponse> IntoResponse for Vec<T> {
    fn into_response(self) -> Option<BotResponse> {
        Some(BotResponse::Many(
            self.into_iter()
                .filter_map(IntoResponse::into_response)
                .collect(),
        ))
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Option<BotResponse> {
        Some(BotResponse::Message(self))
    }
}

impl IntoResponse for &'_ str {
    fn into_response(self) -> Option<BotResponse> {
        Some(BotResponse::Message(self.to_string()))
    }
}

impl IntoResponse for MessageBuilder<'static> {
    fn into_response(self) -> Option<BotResponse> {
        Some(BotResponse::Raw(self))
    }
}

impl BotResponse {
    /// every response in order, with [Many](Self::Many) flattened out
    pub fn flatten(self) -> Vec<BotResponse> {
        match self {
            Self::Many(responses) => responses.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
