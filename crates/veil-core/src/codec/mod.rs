//! Password-keyed pixel permutation.
//!
//! - **digest**: SHA-256 helpers and the circular hex index stream
//! - **permutation**: key-driven permutation tables and swap replay
//! - **grid**: row-major 8-bit pixel buffers
//! - **key**: password keys and key derivation
//! - **keyed**: the encode/decode codec
//!
//! Everything here is pure and synchronous. Tables are rebuilt for every call
//! and never cached, so a codec can be shared freely across threads.

pub mod digest;
pub mod grid;
pub mod key;
pub mod keyed;
pub mod permutation;

pub use digest::{circular_window, sha256_hex, DigestStream, INDEX_WINDOW};
pub use grid::{PixelFormat, PixelGrid};
pub use key::{AxisTables, KeyDerivation, PasswordKey};
pub use keyed::{Direction, KeyedPermutationCodec};
pub use permutation::{PermutationTable, SwapOrder};
