use super::*;

/// HS256 signer and verifier over a process-wide secret.
#[derive(Clone)]
pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
        }
    }
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }
    /// Verifies signature and expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.leeway = 0;
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrp_core::PlayerId;
    use std::time::Duration;

    fn claims() -> Claims {
        Claims::new("u-1".to_string(), PlayerId::from("p-1"), Duration::from_secs(60))
    }

    #[test]
    fn round_trip() {
        let crypto = Crypto::new(b"secret");
        let token = crypto.encode(&claims()).unwrap();
        let decoded = crypto.decode(&token).unwrap();
        assert_eq!(decoded.player(), &PlayerId::from("p-1"));
        assert_eq!(decoded.user(), "u-1");
        assert!(!decoded.expired());
    }

    #[test]
    fn wrong_secret() {
        let token = Crypto::new(b"secret").encode(&claims()).unwrap();
        assert!(Crypto::new(b"other").decode(&token).is_err());
    }

    #[test]
    fn expired_token() {
        let crypto = Crypto::new(b"secret");
        let mut stale = claims();
        stale.iat -= 7200;
        stale.exp = stale.iat + 60;
        assert!(stale.expired());
        let token = crypto.encode(&stale).unwrap();
        assert!(crypto.decode(&token).is_err());
    }
}
