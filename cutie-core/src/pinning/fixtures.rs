//! Self-signed certificates for pinning tests, DER encoded as base64.
//!
//! Expected pins were computed with
//! `openssl x509 -pubkey -noout | openssl pkey -pubin -outform DER | openssl dgst -sha256 -binary | base64`.

pub const EC_P256_CERT: &str = "MIIBhjCCAS2gAwIBAgIUOLKDczz+j9Kdb5cVhDTpxQcUho8wCgYIKoZIzj0EAwIwGTEXMBUGA1UEAwwOYXBpLmN1dGktZS5jb20wHhcNMjYxMDE1MDE1NzQ5WhcNMzYxMDEyMDE1NzQ5WjAZMRcwFQYDVQQDDA5hcGkuY3V0aS1lLmNvbTBZMBMGByqGSM49AgEGCCqGSM49AwEHA0IABAqPmq3DSt4k8IVf53NJOFttJDmAg6oZFmZxXZ9waUhaazIxQ1PTw78K4qms2FltrdWmGiHXOJ6dqDGNPKa9WxujUzBRMB0GA1UdDgQWBBRxXMNSZtAiCiBsCH6MW4ldRDolWTAfBgNVHSMEGDAWgBRxXMNSZtAiCiBsCH6MW4ldRDolWTAPBgNVHRMBAf8EBTADAQH/MAoGCCqGSM49BAMCA0cAMEQCIAo6ejBDmFZ5Qj7CIdAmBgH0NunXMsnW/7NutTj6my5PAiBGQn5WRk/pKOQKa37pYfHNqWlRj59f5jEApgbnCNx4ew==";
pub const EC_P256_PIN: &str = "mPC0BFubl2RsVa0hSoWFYrVx7gCwSlGxhognDaDy4WA=";

pub const EC_P384_CERT: &str = "MIIBxTCCAUqgAwIBAgIUA2AFZCg/KwIHhekFRhdAyCSZehgwCgYIKoZIzj0EAwIwGTEXMBUGA1UEAwwOYXBpLmN1dGktZS5jb20wHhcNMjYxMDE1MDE1NzQ5WhcNMzYxMDEyMDE1NzQ5WjAZMRcwFQYDVQQDDA5hcGkuY3V0aS1lLmNvbTB2MBAGByqGSM49AgEGBSuBBAAiA2IABIR2nV+4XqZt3F2eH8o5+0LCCM1xxiqauElpobpeDfYykrw3dEZfX5/uf+ZSSCmfvGiM5f4IoGRuxBDCLfNoDmZW6sgD21N3HyrEswGKcN/Bm/GKsm9SVo3m3LmchS83XqNTMFEwHQYDVR0OBBYEFDiIqfBX/cC2lG1OE7r/G6FlJmQ4MB8GA1UdIwQYMBaAFDiIqfBX/cC2lG1OE7r/G6FlJmQ4MA8GA1UdEwEB/wQFMAMBAf8wCgYIKoZIzj0EAwIDaQAwZgIxALimQc632PIDq1U4oqiPetZA8bIcsA3rgKXaHlh9Dhh4J+FW2Xs9EvZXdJrAoFN7ZQIxAJG0acTe/f92gIwvMKfjrwVyzajc1p+GppuVWuMsXFcJMdK+UUpDjxQ4rwwHP5qrBA==";
pub const EC_P384_PIN: &str = "X6Vt8ipIt1iZSTgQTtMwEZvPvk9N6PYQqgwe6NZzjZw=";

pub const RSA_2048_CERT: &str = "MIIDEzCCAfugAwIBAgIUEGepJ62HHY3d/niCM1TlVStVTNEwDQYJKoZIhvcNAQELBQAwGTEXMBUGA1UEAwwOYXBpLmN1dGktZS5jb20wHhcNMjYxMDE1MDE1NzUwWhcNMzYxMDEyMDE1NzUwWjAZMRcwFQYDVQQDDA5hcGkuY3V0aS1lLmNvbTCCASIwDQYJKoZIhvcNAQEBBQADggEPADCCAQoCggEBANhe2pNHVf4Cy+ZVydD4pSsfxbXcTcfa1VNl6PBA0d9neJamvlhbs7WY5+PvUHKZi/DVoNGHPKYTbAYzH/RQF7AbwQKbvih6VWhkyZZXTVO6+P52+zvwsh5LDulk8uvPwT94DvaNVuW/ulqYeoCHcmM017tTfBkRMqYu6RBkEEsA3homZUnB+Ha/RIt8BVQWQ7KKC+7K8a5WG/OToqNKZrljQ5asx+0eSNXyJvKvjjO9qlAFEh15/+tHvKHlVG5H4mXVlAWFv98LfV1LQlrjAj7Yi5ALeHALGHZ0VAJAV+5+7geMygDAqDzIYX47tjrAeQLJvrl+z1qcgQmH6+fslQ8CAwEAAaNTMFEwHQYDVR0OBBYEFHlmQqzh+F1kAtGDXb9ryXFVntVWMB8GA1UdIwQYMBaAFHlmQqzh+F1kAtGDXb9ryXFVntVWMA8GA1UdEwEB/wQFMAMBAf8wDQYJKoZIhvcNAQELBQADggEBAA+zoq5WO7sOXcPLa723Za525gVfhzkEz6zQPbHUe/BBHlPEwNr+e3nsdIdUwfeAx0gc2vGeXVDbVu7QTalnvlPIwxqcubRay5QsKQzVS4oqo8P28KgTPQK6wCI2hzfmCp4dK+XmJ27aDnn4a8AW4lrHj8a3omPqHtu9mf2/dnB6gKBUnjiSksNuXdhNZQu9XtJJ7KxaOKk8qx4g+OVctdA6168iwh5Z3M5Sy2rHZS0FjpbfFKbxkxdHaSfG3p55wZurXSmkx3MfDDwyP38pHhaggWwypKEkea1D4B4wSdrdX2LVAIQHhqdqFmOHyRONCv4sgH7pQN3F6XX9XmLhARk=";
pub const RSA_2048_PIN: &str = "9H00VL4ZTZXSk2QiTYor5Fcam9heb6fT35Eh8+4bkNk=";

pub const ED25519_CERT: &str = "MIIBRjCB+aADAgECAhQnOpqr6OUZYjsVMBw17sa178BywzAFBgMrZXAwGTEXMBUGA1UEAwwOYXBpLmN1dGktZS5jb20wHhcNMjYxMDE1MDE1NzUwWhcNMzYxMDEyMDE1NzUwWjAZMRcwFQYDVQQDDA5hcGkuY3V0aS1lLmNvbTAqMAUGAytlcAMhALWwa0xvr7I7JQ6VIx72vtBBocwZORPmAm4o2oZl4a0To1MwUTAdBgNVHQ4EFgQUmnrFCnFzoFBN80MWbKW+SbeTy7IwHwYDVR0jBBgwFoAUmnrFCnFzoFBN80MWbKW+SbeTy7IwDwYDVR0TAQH/BAUwAwEB/zAFBgMrZXADQQDAjOQlC7X8muhPZLxG/gpD97+GcRTzzZhjOs3TEBtUHR1ofy6+xONhu9R0q/Os7WXQnTcBRdoK5GhPHWHKIAAG";
pub const ED25519_PIN: &str = "nslZd/WkA47UQYdLdeJSWShLW2LngQHAz52jqrVVKVo=";

/// Leaf for `api.cuti-e.com` whose issuer name is ISRG Root X1 (a pinned root).
pub const ISRG_X1_ISSUED_CERT: &str = "MIIBaDCCAQ6gAwIBAgIUbOgGiVds0cDJJ0ouugQNSwe4rPIwCgYIKoZIzj0EAwIwTzELMAkGA1UEBhMCVVMxKTAnBgNVBAoTIEludGVybmV0IFNlY3VyaXR5IFJlc2VhcmNoIEdyb3VwMRUwEwYDVQQDEwxJU1JHIFJvb3QgWDEwHhcNMjYxMDE1MDAwMDAwWhcNMzYxMDEyMDAwMDAwWjAZMRcwFQYDVQQDDA5hcGkuY3V0aS1lLmNvbTBZMBMGByqGSM49AgEGCCqGSM49AwEHA0IABHMCwRR6k71E3WR48ZRVEvUu8g4L+qsHBcDurfo3sbqWVlV35n1zgfngUGOJW9thmhkEN9a2YEVVDRZ1dOd8dbcwCgYIKoZIzj0EAwIDSAAwRQIhANhFA+St33fGZGsEZcJNGNtSThiHzThf291s0OZ7f+hHAiBnMLphwA+mY3nyFtFacSY5CbqIOiFN/ZB1GqJQhh7/gw==";

/// Leaf for `api.cuti-e.com` whose issuer name is Amazon Root CA 3 (trusted, not pinned).
pub const AMAZON_CA3_ISSUED_CERT: &str = "MIIBUTCB+KADAgECAhQ0QqEFUdx9hN1NssCulkmWACy4wTAKBggqhkjOPQQDAjA5MQswCQYDVQQGEwJVUzEPMA0GA1UEChMGQW1hem9uMRkwFwYDVQQDExBBbWF6b24gUm9vdCBDQSAzMB4XDTI2MTAxNTAwMDAwMFoXDTM2MTAxMjAwMDAwMFowGTEXMBUGA1UEAwwOYXBpLmN1dGktZS5jb20wWTATBgcqhkjOPQIBBggqhkjOPQMBBwNCAARzAsEUepO9RN1kePGUVRL1LvIOC/qrBwXA7q36N7G6llZVd+Z9c4H54FBjiVvbYZoZBDfWtmBFVQ0WdXTnfHW3MAoGCCqGSM49BAMCA0gAMEUCIAgG3E5hqGJb+0yWoCG5NeylPIaRXtcJZ5pkXpDHRBdWAiEAsvKRrjq5Uz1qY2nIlCRjRrRy9dvN+3Gw5ZubmFXopUw=";
