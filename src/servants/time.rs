//! Time servant: reports the local time as a human-readable string.

use chrono::{Local, NaiveDateTime};

use crate::error::RegistrationError;
use crate::servant::{HandlerDescriptor, Registry};

pub const ROLE_URL: &str = "http://belphanior.net/roles/time/v1";

/// e.g. `Monday, January 2, 2006, 03:04 PM`
const TIME_FORMAT: &str = "%A, %B %-d, %Y, %I:%M %p";

pub fn format_time(time: &NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub fn register(registry: &mut Registry) -> Result<(), RegistrationError> {
    registry.set_role_url(ROLE_URL);
    registry.register_handler(HandlerDescriptor::new("get time string", "GET", "/time"), || {
        format_time(&Local::now().naive_local())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::routing::DispatchRequest;

    #[test]
    fn test_format_time() {
        let time = NaiveDate::from_ymd_opt(2006, 1, 2)
            .unwrap()
            .and_hms_opt(15, 4, 5)
            .unwrap();
        assert_eq!(format_time(&time), "Monday, January 2, 2006, 03:04 PM");
    }

    #[test]
    fn test_time_handler() {
        let mut registry = Registry::new();
        register(&mut registry).unwrap();

        let dispatched = registry
            .call_handler(&DispatchRequest::new("GET", "/time", ""))
            .unwrap();
        assert!(dispatched.body.contains(", "));
        assert!(dispatched.body.ends_with("AM") || dispatched.body.ends_with("PM"));
    }
}
