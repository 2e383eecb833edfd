use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use uuid::Uuid;

type HmacSha512 = Hmac<Sha512>;

/// Signs and verifies session tokens.
///
/// A token is `{session_id}.{hex(mac)}` where the MAC is HMAC-SHA512 over
/// the hyphenated session id string. Session ids never contain `.`, so
/// splitting on the first `.` is unambiguous.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    /// Creates a signer from the configured secret key.
    pub fn new(key: &[u8]) -> Self {
        Self { key: key.to_vec() }
    }

    fn mac_of(&self, message: &str) -> Vec<u8> {
        let mut mac =
            HmacSha512::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(message.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Produces a signed token for the given session id.
    pub fn sign(&self, session_id: Uuid) -> String {
        let id = session_id.to_string();
        let mac = self.mac_of(&id);
        format!("{}.{}", id, hex::encode(mac))
    }

    /// Verifies a token and extracts the session id it carries.
    ///
    /// Returns `None` for malformed tokens (missing separator, empty parts,
    /// non-UUID id segment, non-hex MAC segment) and for MAC mismatches.
    /// A `Some` result only vouches for integrity; the referenced session
    /// must still be looked up.
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let (id_part, mac_part) = token.split_once('.')?;
        if id_part.is_empty() || mac_part.is_empty() {
            return None;
        }

        let session_id = Uuid::parse_str(id_part).ok()?;
        let presented = hex::decode(mac_part).ok()?;
        let expected = self.mac_of(id_part);

        if bool::from(expected.as_slice().ct_eq(presented.as_slice())) {
            Some(session_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"test-secret-key-0123456789abcdef")
    }

    #[test]
    fn sign_verify_round_trip() {
        let signer = signer();
        let id = Uuid::new_v4();
        let token = signer.sign(id);
        assert_eq!(signer.verify(&token), Some(id));
    }

    #[test]
    fn any_single_character_mutation_fails() {
        let signer = signer();
        let token = signer.sign(Uuid::new_v4());

        for i in 0..token.len() {
            let mut mutated: Vec<char> = token.chars().collect();
            mutated[i] = if mutated[i] == '0' { '1' } else { '0' };
            let mutated: String = mutated.into_iter().collect();
            if mutated == token {
                continue;
            }
            assert_eq!(signer.verify(&mutated), None, "mutation at {} accepted", i);
        }
    }

    #[test]
    fn token_signed_with_other_key_fails() {
        let id = Uuid::new_v4();
        let token = TokenSigner::new(b"first-key-first-key-first-key-00").sign(id);
        let other = TokenSigner::new(b"second-key-second-key-second-k00");
        assert_eq!(other.verify(&token), None);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let signer = signer();
        for token in [
            "",
            "no-separator",
            ".deadbeef",
            "0b29bd28-3cb2-4b34-8b0f-17a9318e2cc1.",
            "not-a-uuid.deadbeef",
            "0b29bd28-3cb2-4b34-8b0f-17a9318e2cc1.not-hex",
        ] {
            assert_eq!(signer.verify(token), None, "accepted {:?}", token);
        }
    }

    #[test]
    fn mac_covers_presented_id_bytes() {
        let signer = signer();
        let id = Uuid::new_v4();
        let token = signer.sign(id);
        let (id_part, mac_part) = token.split_once('.').unwrap();
        let uppercased = format!("{}.{}", id_part.to_uppercase(), mac_part);
        assert_eq!(signer.verify(&uppercased), None);
    }
}
