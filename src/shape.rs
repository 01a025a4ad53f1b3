/*!
Capability checks for objects we did not create.

A provider is accepted as soon as it exposes the few operations we rely on.
Anything else it carries is none of our business, so future versions of the
providers adding fields are still accepted.
*/

use crate::host::HostValue;

/// operations the L1 provider must expose
pub const KASPA_PROVIDER_METHODS: &[&str] = &["requestAccounts", "getAccounts", "on"];

/// operations an EIP-1193 provider must expose
pub const EIP1193_PROVIDER_METHODS: &[&str] = &["request", "on"];

/// `true` if `value` is an object with a function under each of `methods`
pub fn has_methods<V: HostValue>(value: &V, methods: &[&str]) -> bool {
    value.is_object()
        && methods.iter().all(|method| {
            value
                .property(method)
                .map(|property| property.is_function())
                .unwrap_or(false)
        })
}

pub fn is_kaspa_provider<V: HostValue>(value: &V) -> bool {
    has_methods(value, KASPA_PROVIDER_METHODS)
}

pub fn is_eip1193_provider<V: HostValue>(value: &V) -> bool {
    has_methods(value, EIP1193_PROVIDER_METHODS)
}

/// check the self identification flag (e.g. `isKaspaWallet`) is exactly `true`
pub fn has_flag<V: HostValue>(value: &V, flag: &str) -> bool {
    value
        .property(flag)
        .and_then(|flag| flag.as_bool())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::{MockValue, eip1193_provider, kaspa_provider};

    #[test]
    fn accepts_complete_kaspa_provider() {
        assert!(is_kaspa_provider(&kaspa_provider()));
    }

    #[test]
    fn rejects_partial_kaspa_provider() {
        let provider = MockValue::object([
            ("requestAccounts", MockValue::Function),
            ("on", MockValue::Function),
        ]);
        assert!(!is_kaspa_provider(&provider));
    }

    #[test]
    fn method_must_be_callable() {
        let provider = MockValue::object([
            ("request", MockValue::Str("not a function".to_owned())),
            ("on", MockValue::Function),
        ]);
        assert!(!is_eip1193_provider(&provider));
    }

    #[test]
    fn tolerates_any_input() {
        assert!(!is_kaspa_provider(&MockValue::Bool(true)));
        assert!(!is_kaspa_provider(&MockValue::Str("kaspa".to_owned())));
        assert!(!is_eip1193_provider(&MockValue::Function));
        assert!(!is_eip1193_provider(&MockValue::object([])));
    }

    #[test]
    fn extra_fields_are_fine() {
        let provider = MockValue::object([
            ("request", MockValue::Function),
            ("on", MockValue::Function),
            ("isMetaMask", MockValue::Bool(false)),
            ("_experimental", MockValue::object([])),
        ]);
        assert!(is_eip1193_provider(&provider));
    }

    #[test]
    fn flag_must_be_true() {
        assert!(has_flag(&eip1193_provider(true), "isKaspaWallet"));
        assert!(!has_flag(&eip1193_provider(false), "isKaspaWallet"));
        assert!(!has_flag(&kaspa_provider(), "isKaspaWallet"));

        let truthy = MockValue::object([("isKaspaWallet", MockValue::Str("yes".to_owned()))]);
        assert!(!has_flag(&truthy, "isKaspaWallet"));
    }
}
