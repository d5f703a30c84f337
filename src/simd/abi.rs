//! Width configurations ("ABIs") and the sets of them a context supports.
//!
//! Each configuration is a zero-sized marker type implementing [`SimdAbi`],
//! which names the batch type used for a given element type. Because marker
//! types cannot be stored in a list, every shipped configuration also has an
//! [`AbiKind`] descriptor; sets of configurations are `&'static [AbiKind]`
//! and the dispatcher turns each descriptor back into its marker type.

use std::fmt;
use std::str::FromStr;

use crate::error::{unknown_abi, HarnessError, Result};
use crate::simd::fixed::FixedSimd;
use crate::simd::traits::{SimdBatch, SimdElement};

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
use crate::simd::avx2::f64x4::F64x4;

#[cfg(all(neon, target_arch = "aarch64"))]
use crate::simd::neon::f64x2::F64x2;

/// Marker for a width configuration.
pub trait Abi: Copy + Default + fmt::Debug + Send + Sync + 'static {}

/// A width configuration that can hold elements of type `T`.
pub trait SimdAbi<T: SimdElement>: Abi {
    type Simd: SimdBatch<T>;
}

/// Batch type of element `T` under configuration `A`.
pub type Simd<T, A> = <A as SimdAbi<T>>::Simd;

/// One lane, any element type.
#[derive(Copy, Clone, Debug, Default)]
pub struct Scalar;

impl Abi for Scalar {}

impl<T: SimdElement> SimdAbi<T> for Scalar {
    type Simd = FixedSimd<T, 1>;
}

/// `N` lanes in a portable array, any element type.
#[derive(Copy, Clone, Debug, Default)]
pub struct Fixed<const N: usize>;

impl<const N: usize> Abi for Fixed<N> {}

impl<T: SimdElement, const N: usize> SimdAbi<T> for Fixed<N> {
    type Simd = FixedSimd<T, N>;
}

/// 4 × f64 in an AVX register.
#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
#[derive(Copy, Clone, Debug, Default)]
pub struct Avx2;

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
impl Abi for Avx2 {}

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
impl SimdAbi<f64> for Avx2 {
    type Simd = F64x4;
}

/// 2 × f64 in a NEON register.
#[cfg(all(neon, target_arch = "aarch64"))]
#[derive(Copy, Clone, Debug, Default)]
pub struct Neon;

#[cfg(all(neon, target_arch = "aarch64"))]
impl Abi for Neon {}

#[cfg(all(neon, target_arch = "aarch64"))]
impl SimdAbi<f64> for Neon {
    type Simd = F64x2;
}

/// Descriptor of a shipped width configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AbiKind {
    Scalar,
    Fixed2,
    Fixed4,
    Fixed8,
    Avx2,
    Neon,
}

impl AbiKind {
    pub const ALL: [AbiKind; 6] = [
        AbiKind::Scalar,
        AbiKind::Fixed2,
        AbiKind::Fixed4,
        AbiKind::Fixed8,
        AbiKind::Avx2,
        AbiKind::Neon,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            AbiKind::Scalar => "scalar",
            AbiKind::Fixed2 => "fixed_2",
            AbiKind::Fixed4 => "fixed_4",
            AbiKind::Fixed8 => "fixed_8",
            AbiKind::Avx2 => "avx2",
            AbiKind::Neon => "neon",
        }
    }

    /// Lane count for 64-bit elements.
    pub const fn width(self) -> usize {
        match self {
            AbiKind::Scalar => 1,
            AbiKind::Fixed2 | AbiKind::Neon => 2,
            AbiKind::Fixed4 | AbiKind::Avx2 => 4,
            AbiKind::Fixed8 => 8,
        }
    }

    /// Backed by processor intrinsics rather than portable code.
    pub const fn is_native(self) -> bool {
        matches!(self, AbiKind::Avx2 | AbiKind::Neon)
    }

    /// Whether this build compiled the configuration's batch type.
    pub const fn is_compiled(self) -> bool {
        match self {
            AbiKind::Avx2 => cfg!(all(avx2, any(target_arch = "x86", target_arch = "x86_64"))),
            AbiKind::Neon => cfg!(all(neon, target_arch = "aarch64")),
            _ => true,
        }
    }
}

impl fmt::Display for AbiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AbiKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        AbiKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| unknown_abi(s.trim()))
    }
}

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
const HOST_ABIS: &[AbiKind] = &[
    AbiKind::Scalar,
    AbiKind::Avx2,
    AbiKind::Fixed2,
    AbiKind::Fixed4,
    AbiKind::Fixed8,
];

#[cfg(all(neon, target_arch = "aarch64"))]
const HOST_ABIS: &[AbiKind] = &[
    AbiKind::Scalar,
    AbiKind::Neon,
    AbiKind::Fixed2,
    AbiKind::Fixed4,
    AbiKind::Fixed8,
];

#[cfg(not(any(
    all(avx2, any(target_arch = "x86", target_arch = "x86_64")),
    all(neon, target_arch = "aarch64")
)))]
const HOST_ABIS: &[AbiKind] = &[
    AbiKind::Scalar,
    AbiKind::Fixed2,
    AbiKind::Fixed4,
    AbiKind::Fixed8,
];

const DEVICE_ABIS: &[AbiKind] = &[AbiKind::Scalar, AbiKind::Fixed4];

/// Configurations usable on the host, in dispatch order.
pub fn host_abi_set() -> &'static [AbiKind] {
    HOST_ABIS
}

/// Configurations usable inside a device kernel, in dispatch order.
pub fn device_abi_set() -> &'static [AbiKind] {
    DEVICE_ABIS
}
