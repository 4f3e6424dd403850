use domain::transform::Destination;
use tricrypt_core::primitives::{Algorithm, RsaFormat};
use tricrypt_core::BigUint;

use super::states::{ForceMode, HashMode, Secret};

pub struct RsaParams {
    pub modulus: BigUint,
    pub exponent: BigUint,
    pub format: RsaFormat,
}

pub struct CryptoParams {
    pub hash_mode: HashMode,
    pub force: ForceMode,
    pub algorithm: Algorithm,
    pub destination: Destination,
    pub key: Secret,
    pub nonce: Secret,
    pub rsa: Option<RsaParams>,
}
