// Identity Verifier: signed `token` cookie issued by POST /jwt, checked by `AuthUser`.

pub mod cookie;
pub mod handlers;
pub mod token;
