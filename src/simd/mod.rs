/*! Runtime CPU feature detection and SIMD kernel dispatch.

This module detects at runtime which vector instruction sets the CPU and
the operating system support, and exposes width-specialized byte-scanning
kernels for the widest usable level. Two primitives are provided per width:

- `find_first_eq`: position of the first byte equal to a given value.
- `prefix_eq_len`: length of the maximal common prefix of two buffers.

All widths, and the scalar fallback, return bitwise-identical results on
identical inputs. The detected level is advisory: callers must
produce correct results on the scalar path too.

Detection fails closed. A feature is reported only when the CPU advertises
it *and* the OS has enabled the corresponding register state via XCR0
(YMM for AVX2, YMM+ZMM+opmask for AVX-512).
*/

use std::sync::OnceLock;

pub(crate) mod scalar;

#[cfg(target_arch = "x86_64")]
pub(crate) mod avx2;
#[cfg(target_arch = "x86_64")]
pub(crate) mod avx512;
#[cfg(target_arch = "x86_64")]
pub(crate) mod sse42;


/// Minimum text length for the SIMD search path. Below this, kernel setup
/// costs more than it saves and the scalar engine is used instead.
pub(crate) const SIMD_THRESHOLD: usize = 64;

/// CPU features relevant to the byte-scan kernels.
///
/// Obtained from [`features`], which probes the CPU once per process and
/// caches the result.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CpuFeatures {
    /// SSE4.2 is available.
    pub sse42: bool,
    /// AVX2 is available and the OS saves/restores YMM registers.
    pub avx2: bool,
    /// AVX-512F is available and the OS saves/restores ZMM and opmask
    /// registers.
    pub avx512f: bool,
    /// AVX-512BW (byte/word operations on ZMM registers) is available.
    pub avx512bw: bool,
}

/// The widest SIMD level usable on this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SimdLevel {
    /// No vector acceleration, plain byte loops.
    Scalar,
    /// 16-byte lanes.
    Sse42,
    /// 32-byte lanes.
    Avx2,
    /// 64-byte lanes.
    Avx512,
}

static FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// Returns the CPU features detected at first use.
///
/// The probe runs exactly once per process; subsequent calls are lock-free
/// reads of the cached value.
pub fn features() -> CpuFeatures {
    *FEATURES.get_or_init(detect)
}

/// Returns the widest SIMD level supported by both the CPU and the OS.
///
/// AVX-512 is reported only when both AVX-512F and AVX-512BW are present,
/// as the byte-compare kernels require BW.
pub fn simd_level() -> SimdLevel {
    let f = features();
    if f.avx512f && f.avx512bw {
        SimdLevel::Avx512
    } else if f.avx2 {
        SimdLevel::Avx2
    } else if f.sse42 {
        SimdLevel::Sse42
    } else {
        SimdLevel::Scalar
    }
}

/// Width-specialized kernel pair selected by [`kernels_for`].
///
/// The function pointers target `#[target_feature]` kernels; callers must
/// only invoke them after [`simd_level`] reported the corresponding level.
#[derive(Clone, Copy)]
pub(crate) struct Kernels {
    pub(crate) find_first_eq: unsafe fn(&[u8], u8) -> Option<usize>,
    pub(crate) prefix_eq_len: unsafe fn(&[u8], &[u8]) -> usize,
}

#[cfg(target_arch = "x86_64")]
const SSE42_KERNELS: Kernels = Kernels {
    find_first_eq: sse42::find_first_eq,
    prefix_eq_len: sse42::prefix_eq_len,
};

#[cfg(target_arch = "x86_64")]
const AVX2_KERNELS: Kernels = Kernels {
    find_first_eq: avx2::find_first_eq,
    prefix_eq_len: avx2::prefix_eq_len,
};

#[cfg(target_arch = "x86_64")]
const AVX512_KERNELS: Kernels = Kernels {
    find_first_eq: avx512::find_first_eq,
    prefix_eq_len: avx512::prefix_eq_len,
};

/// Returns the kernels for the widest available level, or `None` when the
/// text is below [`SIMD_THRESHOLD`] or no vector level is usable.
#[cfg(target_arch = "x86_64")]
pub(crate) fn kernels_for(text_len: usize) -> Option<Kernels> {
    if text_len < SIMD_THRESHOLD {
        return None;
    }
    match simd_level() {
        SimdLevel::Avx512 => Some(AVX512_KERNELS),
        SimdLevel::Avx2 => Some(AVX2_KERNELS),
        SimdLevel::Sse42 => Some(SSE42_KERNELS),
        SimdLevel::Scalar => None,
    }
}

#[cfg(not(target_arch = "x86_64"))]
pub(crate) fn kernels_for(_text_len: usize) -> Option<Kernels> {
    None
}

/// Probes the CPU via the identification instruction and the extended
/// control register.
///
/// Consults leaf 0 (maximum leaf), leaf 1 (SSE4.2, OSXSAVE), XCR0 (OS
/// register-state enablement) and leaf 7 (AVX2, AVX-512F, AVX-512BW).
/// Every check that cannot be performed leaves the flag off.
#[cfg(target_arch = "x86_64")]
fn detect() -> CpuFeatures {
    use std::arch::x86_64::__cpuid_count;

    let mut features = CpuFeatures::default();

    let leaf0 = unsafe { __cpuid_count(0, 0) };
    if leaf0.eax < 1 {
        return features;
    }

    let leaf1 = unsafe { __cpuid_count(1, 0) };

    // SSE4.2: leaf 1, ECX bit 20.
    if leaf1.ecx & (1 << 20) != 0 {
        features.sse42 = true;
    }

    // OSXSAVE (leaf 1, ECX bit 27) gates XGETBV. Without it the OS state
    // for wide registers cannot be queried, so no AVX level is reported.
    if leaf1.ecx & (1 << 27) == 0 {
        return features;
    }

    let xcr0 = unsafe { xgetbv0() };
    let os_ymm = xcr0 & 0x6 == 0x6;
    let os_zmm = xcr0 & 0xe6 == 0xe6;

    if !os_ymm {
        return features;
    }

    if leaf0.eax >= 7 {
        let leaf7 = unsafe { __cpuid_count(7, 0) };

        // AVX2: leaf 7, EBX bit 5.
        if leaf7.ebx & (1 << 5) != 0 {
            features.avx2 = true;
        }

        // AVX-512F: leaf 7, EBX bit 16. Requires ZMM and opmask state.
        if os_zmm && leaf7.ebx & (1 << 16) != 0 {
            features.avx512f = true;

            // AVX-512BW: leaf 7, EBX bit 30.
            if leaf7.ebx & (1 << 30) != 0 {
                features.avx512bw = true;
            }
        }
    }

    features
}

#[cfg(not(target_arch = "x86_64"))]
fn detect() -> CpuFeatures {
    CpuFeatures::default()
}

/// Reads XCR0. Only called after cpuid reported OSXSAVE, which guarantees
/// the instruction is executable from user mode.
#[cfg(target_arch = "x86_64")]
unsafe fn xgetbv0() -> u64 {
    let eax: u32;
    let edx: u32;
    std::arch::asm!(
        "xgetbv",
        in("ecx") 0_u32,
        out("eax") eax,
        out("edx") edx,
        options(nomem, nostack, preserves_flags),
    );
    (edx as u64) << 32 | eax as u64
}
