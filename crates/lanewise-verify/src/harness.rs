//! Oracle-vs-backend checking
//!
//! [`OracleCheck`] runs backend primitives and their oracle definitions on the
//! same inputs and records every case in a [`CheckReport`]. Both sides run on
//! the same vector type `Simd<T, N, B>`: the oracle functions are generic over
//! the backend tag, so no conversion sits between the two results.
//!
//! ```rust
//! use lanewise_core::Simulated;
//! use lanewise_verify::{CheckConfig, OracleCheck};
//!
//! let mut check = OracleCheck::<Simulated>::new(CheckConfig::default().with_random_rounds(8)).unwrap();
//! check.check_integer::<i8, 16>().unwrap();
//! assert!(check.report().passed());
//! ```

use std::marker::PhantomData;

use lanewise_core::primitives::oracle;
use lanewise_core::{
    Backend, DefaultBackend, Element, ElementKind, FloatElement, IntElement, Primitive, Rescale,
    Simd, Widened,
};
use num_traits::AsPrimitive;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::compare::{compare_lanes, LaneMismatch};
use crate::config::CheckConfig;
use crate::error::{Error, Result};
use crate::inputs::{sanitize, InputGenerator};

/// Outcome of one `(primitive, element, lanes)` case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseReport {
    pub primitive: Primitive,
    pub element: ElementKind,
    pub lanes: usize,
    /// Input vectors checked
    pub cases: usize,
    /// Relative tolerance applied; zero for exact primitives
    pub tolerance: f64,
    pub mismatches: Vec<LaneMismatch>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// All cases of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub backend: &'static str,
    pub seed: u64,
    pub cases: Vec<CaseReport>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.cases.iter().all(CaseReport::passed)
    }

    /// Cases with at least one mismatching lane
    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|case| !case.passed())
    }

    /// Input vectors checked across all cases
    pub fn total_inputs(&self) -> usize {
        self.cases.iter().map(|case| case.cases).sum()
    }

    /// `Err` describing the first divergence, if any
    pub fn into_result(self) -> Result<Self> {
        let err = self
            .failures()
            .next()
            .map(|case| divergence(self.backend, case));
        match err {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Error for the first mismatching lane of `case`
fn divergence(backend: &'static str, case: &CaseReport) -> Error {
    let Some(first) = case.mismatches.first() else {
        return Error::Other(anyhow::anyhow!("{} reported no mismatch", case.primitive));
    };
    match first.relative_error {
        Some(relative_error) => Error::ToleranceExceeded {
            backend,
            primitive: case.primitive,
            element: case.element,
            lanes: case.lanes,
            lane: first.lane,
            relative_error,
            tolerance: case.tolerance,
        },
        None => Error::Mismatch {
            backend,
            primitive: case.primitive,
            element: case.element,
            lanes: case.lanes,
            lane: first.lane,
            got: first.got.clone(),
            expected: first.expected.clone(),
        },
    }
}

#[repr(C, align(64))]
struct Aligned<A>(A);

/// Checker for backend `B`
pub struct OracleCheck<B: Backend> {
    config: CheckConfig,
    inputs: InputGenerator,
    report: CheckReport,
    _backend: PhantomData<B>,
}

impl<B: Backend> OracleCheck<B> {
    pub fn new(config: CheckConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inputs: InputGenerator::new(config.seed, config.random_rounds),
            report: CheckReport {
                backend: B::NAME,
                seed: config.seed,
                cases: Vec::new(),
            },
            config,
            _backend: PhantomData,
        })
    }

    pub fn report(&self) -> &CheckReport {
        &self.report
    }

    pub fn finish(self) -> CheckReport {
        self.report
    }

    /// Compare `(backend, oracle)` output pairs and record the case
    fn record<U: Element>(
        &mut self,
        primitive: Primitive,
        element: ElementKind,
        lanes: usize,
        outputs: impl IntoIterator<Item = (Vec<U>, Vec<U>)>,
    ) -> Result<()> {
        let tolerance = if primitive.is_estimate() {
            B::tolerance(primitive) * self.config.tolerance_scale
        } else {
            0.0
        };
        let limit = self.config.max_reported;
        let mut cases = 0;
        let mut mismatches = Vec::new();
        for (got, expected) in outputs {
            cases += 1;
            if mismatches.len() < limit {
                let left = limit - mismatches.len();
                mismatches.extend(compare_lanes(&got, &expected, tolerance, left));
            }
        }

        let case = CaseReport {
            primitive,
            element,
            lanes,
            cases,
            tolerance,
            mismatches,
        };
        if case.passed() {
            debug!(%primitive, %element, lanes, cases, "matches oracle");
        } else {
            for m in &case.mismatches {
                warn!(
                    backend = B::NAME,
                    %primitive,
                    %element,
                    lanes,
                    lane = m.lane,
                    got = %m.got,
                    expected = %m.expected,
                    "diverges from oracle"
                );
            }
        }

        let failed = !case.passed();
        self.report.cases.push(case);
        if failed && self.config.fail_fast {
            if let Some(case) = self.report.cases.last() {
                return Err(divergence(B::NAME, case));
            }
        }
        Ok(())
    }

    /// Run `f` over sanitized operand pairs when `primitive` is enabled
    fn binary<T, U, const N: usize>(
        &mut self,
        primitive: Primitive,
        pairs: &[([T; N], [T; N])],
        f: impl Fn(Simd<T, N, B>, Simd<T, N, B>) -> (Vec<U>, Vec<U>),
    ) -> Result<()>
    where
        T: Element,
        U: Element,
    {
        if !self.config.is_enabled(primitive) {
            return Ok(());
        }
        let outputs: Vec<_> = pairs
            .iter()
            .map(|&(a, b)| {
                f(
                    Simd::from_array(sanitize(primitive, a)),
                    Simd::from_array(sanitize(primitive, b)),
                )
            })
            .collect();
        self.record(primitive, T::KIND, N, outputs)
    }

    /// Run `f` over sanitized single operands when `primitive` is enabled
    fn unary<T, U, const N: usize>(
        &mut self,
        primitive: Primitive,
        vectors: &[[T; N]],
        f: impl Fn(Simd<T, N, B>) -> (Vec<U>, Vec<U>),
    ) -> Result<()>
    where
        T: Element,
        U: Element,
    {
        if !self.config.is_enabled(primitive) {
            return Ok(());
        }
        let outputs: Vec<_> = vectors
            .iter()
            .map(|&v| f(Simd::from_array(sanitize(primitive, v))))
            .collect();
        self.record(primitive, T::KIND, N, outputs)
    }

    /// `abs`, `min`, `max`, `movemask` and `load_aligned`
    #[instrument(skip(self), fields(backend = B::NAME, element = %T::KIND, lanes = N))]
    pub fn check_lanewise<T: Element, const N: usize>(&mut self) -> Result<()> {
        let pairs = self.inputs.pairs::<T, N>();
        let vectors: Vec<[T; N]> = pairs.iter().map(|&(a, _)| a).collect();

        self.unary(Primitive::Abs, &vectors, |v| {
            (B::abs(v).as_slice().to_vec(), oracle::abs(v).as_slice().to_vec())
        })?;
        self.binary(Primitive::Min, &pairs, |a, b| {
            (B::min(a, b).as_slice().to_vec(), oracle::min(a, b).as_slice().to_vec())
        })?;
        self.binary(Primitive::Max, &pairs, |a, b| {
            (B::max(a, b).as_slice().to_vec(), oracle::max(a, b).as_slice().to_vec())
        })?;
        self.unary(Primitive::Movemask, &vectors, |v| {
            (vec![B::movemask(v)], vec![oracle::movemask(v)])
        })?;
        self.unary(Primitive::LoadAligned, &vectors, |v| {
            let buf = Aligned(v.to_array());
            let got: Simd<T, N, B> = B::load_aligned(&buf.0);
            let expected: Simd<T, N, B> = oracle::load(&buf.0);
            (got.as_slice().to_vec(), expected.as_slice().to_vec())
        })
    }

    /// `add_saturated` and `sub_saturated`
    #[instrument(skip(self), fields(backend = B::NAME, element = %T::KIND, lanes = N))]
    pub fn check_integer<T: IntElement, const N: usize>(&mut self) -> Result<()> {
        let pairs = self.inputs.pairs::<T, N>();
        self.binary(Primitive::AddSaturated, &pairs, |a, b| {
            (
                B::add_saturated(a, b).as_slice().to_vec(),
                oracle::add_saturated(a, b).as_slice().to_vec(),
            )
        })?;
        self.binary(Primitive::SubSaturated, &pairs, |a, b| {
            (
                B::sub_saturated(a, b).as_slice().to_vec(),
                oracle::sub_saturated(a, b).as_slice().to_vec(),
            )
        })
    }

    /// Rounding, square root and the reciprocal estimates
    #[instrument(skip(self), fields(backend = B::NAME, element = %T::KIND, lanes = N))]
    pub fn check_float<T: FloatElement, const N: usize>(&mut self) -> Result<()> {
        let vectors = self.inputs.vectors::<T, N>();
        self.unary(Primitive::Round, &vectors, |v| {
            (B::round(v).as_slice().to_vec(), oracle::round(v).as_slice().to_vec())
        })?;
        self.unary(Primitive::Sqrt, &vectors, |v| {
            (B::sqrt(v).as_slice().to_vec(), oracle::sqrt(v).as_slice().to_vec())
        })?;
        self.unary(Primitive::ReciprocalEstimate, &vectors, |v| {
            (
                B::reciprocal_estimate(v).as_slice().to_vec(),
                oracle::reciprocal_estimate(v).as_slice().to_vec(),
            )
        })?;
        self.unary(Primitive::ReciprocalSqrtEstimate, &vectors, |v| {
            (
                B::reciprocal_sqrt_estimate(v).as_slice().to_vec(),
                oracle::reciprocal_sqrt_estimate(v).as_slice().to_vec(),
            )
        })?;
        self.unary(Primitive::RoundToInteger, &vectors, |v| {
            (
                B::round_to_integer(v).as_slice().to_vec(),
                oracle::round_to_integer(v).as_slice().to_vec(),
            )
        })
    }

    /// `mul_widened`, `reduce_add` into the widened type and `mul_sum`, with
    /// `M = N / 2` output lanes
    #[instrument(skip(self), fields(backend = B::NAME, element = %T::KIND, lanes = N))]
    pub fn check_widening<T, const N: usize, const M: usize>(&mut self) -> Result<()>
    where
        T: Rescale<2, 1> + AsPrimitive<Widened<T>>,
        Widened<T>: AsPrimitive<Widened<T>>,
    {
        let pairs = self.inputs.pairs::<T, N>();
        let accumulators = self.inputs.vectors::<Widened<T>, M>();

        self.binary(Primitive::MulWidened, &pairs, |a, b| {
            (
                B::mul_widened(a, b).as_slice().to_vec(),
                oracle::mul_widened(a, b).as_slice().to_vec(),
            )
        })?;
        let vectors: Vec<[T; N]> = pairs.iter().map(|&(a, _)| a).collect();
        self.unary(Primitive::ReduceAdd, &vectors, |v| {
            let got: Simd<Widened<T>, M, B> = B::reduce_add(v);
            let expected: Simd<Widened<T>, M, B> = oracle::reduce_add(v);
            (got.as_slice().to_vec(), expected.as_slice().to_vec())
        })?;
        if !self.config.is_enabled(Primitive::MulSum) {
            return Ok(());
        }
        let len = accumulators.len();
        let outputs: Vec<_> = pairs
            .iter()
            .enumerate()
            .map(|(k, &(a, b))| {
                let (a, b) = (Simd::<T, N, B>::from_array(a), Simd::from_array(b));
                let acc = Simd::<Widened<T>, M, B>::from_array(accumulators[k % len]);
                let got = B::mul_sum(a, b, acc);
                let expected = oracle::mul_sum(a, b, acc);
                (got.as_slice().to_vec(), expected.as_slice().to_vec())
            })
            .collect();
        self.record(Primitive::MulSum, T::KIND, N, outputs)
    }

    /// `maddubs` over `N` byte lanes into `M = N / 2` lanes
    #[instrument(skip(self), fields(backend = B::NAME, lanes = N))]
    pub fn check_maddubs<const N: usize, const M: usize>(&mut self) -> Result<()> {
        if !self.config.is_enabled(Primitive::Maddubs) {
            return Ok(());
        }
        let unsigned = self.inputs.vectors::<u8, N>();
        let signed = self.inputs.vectors::<i8, N>();
        let len = signed.len();
        let outputs: Vec<_> = unsigned
            .iter()
            .enumerate()
            .map(|(k, &a)| {
                let a = Simd::<u8, N, B>::from_array(a);
                let b = Simd::<i8, N, B>::from_array(signed[(k * 5 + 1) % len]);
                let got: Simd<i16, M, B> = B::maddubs(a, b);
                let expected: Simd<i16, M, B> = oracle::maddubs(a, b);
                (got.as_slice().to_vec(), expected.as_slice().to_vec())
            })
            .collect();
        self.record(Primitive::Maddubs, ElementKind::U8, N, outputs)
    }

    /// Every primitive over the 64-, 128- and 256-bit shapes
    pub fn check_standard_matrix(&mut self) -> Result<()> {
        macro_rules! lanewise {
            ($($t:ty: $($n:literal),+;)*) => {
                $($(self.check_lanewise::<$t, $n>()?;)+)*
            };
        }
        macro_rules! integer {
            ($($t:ty: $($n:literal),+;)*) => {
                $($(self.check_integer::<$t, $n>()?;)+)*
            };
        }

        lanewise! {
            i8: 8, 16, 32;
            u8: 8, 16, 32;
            i16: 4, 8, 16;
            u16: 4, 8, 16;
            i32: 2, 4, 8;
            u32: 2, 4, 8;
            i64: 1, 2, 4;
            u64: 1, 2, 4;
            f32: 2, 4, 8;
            f64: 1, 2, 4;
        }
        integer! {
            i8: 8, 16, 32;
            u8: 8, 16, 32;
            i16: 4, 8, 16;
            u16: 4, 8, 16;
            i32: 2, 4, 8;
            u32: 2, 4, 8;
            i64: 1, 2, 4;
            u64: 1, 2, 4;
        }

        self.check_float::<f32, 2>()?;
        self.check_float::<f32, 4>()?;
        self.check_float::<f32, 8>()?;
        self.check_float::<f64, 1>()?;
        self.check_float::<f64, 2>()?;
        self.check_float::<f64, 4>()?;

        // Half-register inputs, the shapes widening overrides accept
        self.check_widening::<i8, 8, 4>()?;
        self.check_widening::<u8, 8, 4>()?;
        self.check_widening::<i16, 4, 2>()?;
        self.check_widening::<u16, 4, 2>()?;
        self.check_widening::<i32, 2, 1>()?;
        self.check_widening::<u32, 2, 1>()?;
        self.check_widening::<f32, 2, 1>()?;
        // Full registers, for the reduction and mul_sum overrides
        self.check_widening::<i8, 16, 8>()?;
        self.check_widening::<u8, 16, 8>()?;
        self.check_widening::<i16, 8, 4>()?;
        self.check_widening::<u16, 8, 4>()?;
        self.check_widening::<i32, 4, 2>()?;
        self.check_widening::<u32, 4, 2>()?;

        self.check_maddubs::<16, 8>()?;
        self.check_maddubs::<32, 16>()?;
        Ok(())
    }
}

/// Check backend `B` over the standard matrix
pub fn check_backend<B: Backend>(config: CheckConfig) -> Result<CheckReport> {
    let mut check = OracleCheck::<B>::new(config)?;
    check.check_standard_matrix()?;
    let report = check.finish();
    info!(
        backend = report.backend,
        cases = report.cases.len(),
        inputs = report.total_inputs(),
        passed = report.passed(),
        "oracle check finished"
    );
    Ok(report)
}

/// Check the compile-time default backend over the standard matrix
pub fn check_all(config: CheckConfig) -> Result<CheckReport> {
    check_backend::<DefaultBackend>(config)
}
