pub(super) use crate::testing::{market, member, read_json_body, request, staff};

use crate::accounts::{Credentials, Registration};

pub(super) fn registration(username: &str, phone: &str) -> Registration {
    Registration {
        username: username.to_string(),
        phone_number: phone.to_string(),
    }
}

pub(super) fn credentials(username: &str, phone: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        phone_number: phone.to_string(),
    }
}
