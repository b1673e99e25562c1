mod signature;
mod verify;

pub use {
    signature::{TokenInfo, decode, decode_at, encode},
    verify::{checksum, verify},
};
