//! Compact JWS encoding.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use seidan_hsm::KeyHandle;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::algorithm::Algorithm;
use crate::constants::TOKEN_TYPE;
use crate::error::IssueError;

/// An unsigned token: a JOSE header and a claims payload.
///
/// Signing goes through a [`KeyHandle`], so the private key never has to be
/// in process memory. The result is the compact serialization
/// `b64url(header).b64url(payload).b64url(signature)`.
///
/// # Example
///
/// ```
/// use seidan::{Algorithm, Token};
///
/// let mut token = Token::new(Algorithm::EdDsa);
/// token.header_mut().insert("kid".into(), "abc".into());
/// token.payload_mut().insert("iss".into(), "test".into());
///
/// assert_eq!(token.header()["alg"], "EdDSA");
/// assert_eq!(token.header()["typ"], "JWT");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    algorithm: Algorithm,
    header: Map<String, Value>,
    payload: Map<String, Value>,
}

impl Token {
    /// Creates a token whose header names `algorithm` and type `JWT`.
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        let mut header = Map::new();
        header.insert("alg".into(), algorithm.as_str().into());
        header.insert("typ".into(), TOKEN_TYPE.into());

        Self {
            algorithm,
            header,
            payload: Map::new(),
        }
    }

    /// Returns the signature algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns the header.
    #[must_use]
    pub fn header(&self) -> &Map<String, Value> {
        &self.header
    }

    /// Returns the header for modification.
    pub fn header_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.header
    }

    /// Returns the payload.
    #[must_use]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Returns the payload for modification.
    pub fn payload_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.payload
    }

    /// Merges the fields of `claims` into the payload.
    ///
    /// # Errors
    ///
    /// Returns `IssueError::TokenEncoding` if `claims` does not serialize to
    /// a JSON object.
    pub fn set_claims(&mut self, claims: &impl Serialize) -> Result<(), IssueError> {
        match serde_json::to_value(claims).map_err(encoding_error)? {
            Value::Object(fields) => {
                self.payload.extend(fields);
                Ok(())
            }
            other => Err(IssueError::TokenEncoding {
                reason: format!("claims must be a JSON object, got {other}"),
            }),
        }
    }

    /// Signs the token with `key` and returns its compact serialization.
    ///
    /// The caller is responsible for `key` matching the header algorithm.
    ///
    /// # Errors
    ///
    /// Returns `IssueError::TokenEncoding` if the header or payload cannot be
    /// serialized and `IssueError::Signing` if the key fails to sign or
    /// returns a malformed signature.
    pub fn sign(&self, key: &dyn KeyHandle) -> Result<String, IssueError> {
        let header = serde_json::to_vec(&self.header).map_err(encoding_error)?;
        let payload = serde_json::to_vec(&self.payload).map_err(encoding_error)?;
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(payload)
        );

        let signing_error = |reason: String| IssueError::Signing {
            key: key.display_name().to_string(),
            reason,
        };

        let raw = key
            .sign(signing_input.as_bytes())
            .map_err(|e| signing_error(e.to_string()))?;

        let signature = match self.algorithm {
            Algorithm::Rs256 | Algorithm::EdDsa => raw,
            Algorithm::Es256 => p256::ecdsa::Signature::from_der(&raw)
                .map_err(|e| signing_error(format!("malformed ECDSA signature: {e}")))?
                .to_bytes()
                .to_vec(),
        };

        Ok(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }
}

fn encoding_error(e: serde_json::Error) -> IssueError {
    IssueError::TokenEncoding {
        reason: e.to_string(),
    }
}
