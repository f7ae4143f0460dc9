//! Core traits for evaluable models and domain predicates.

/// A pure function from an input to an output.
///
/// Models are evaluated concurrently during parallel search and must be
/// `Send + Sync`. Any `Fn(&I) -> O` closure is a model.
///
/// # Examples
///
/// ```
/// use u_piecewise::model::Model;
///
/// #[derive(Default)]
/// struct Line { k: f64, m: f64 }
///
/// impl Model<f64, f64> for Line {
///     fn evaluate(&self, x: &f64) -> f64 {
///         self.k * x + self.m
///     }
/// }
///
/// assert_eq!(Line { k: 2.0, m: 1.0 }.evaluate(&3.0), 7.0);
/// ```
pub trait Model<I, O>: Send + Sync {
    /// Computes the model output for `input`.
    fn evaluate(&self, input: &I) -> O;
}

impl<I, O, F> Model<I, O> for F
where
    F: Fn(&I) -> O + Send + Sync,
{
    fn evaluate(&self, input: &I) -> O {
        self(input)
    }
}

/// A predicate selecting the inputs handled by one segment.
///
/// Any `Fn(&I) -> bool` closure is a domain.
pub trait Domain<I>: Send + Sync {
    /// Whether `input` belongs to this domain.
    fn accepts(&self, input: &I) -> bool;
}

impl<I, F> Domain<I> for F
where
    F: Fn(&I) -> bool + Send + Sync,
{
    fn accepts(&self, input: &I) -> bool {
        self(input)
    }
}

/// The value returned when no segment accepts an input.
///
/// Floating-point outputs use NaN so that a miss poisons any score built
/// on top of it; integer outputs use zero. Tuples and arrays use the
/// sentinel of each element, strings and collections are empty.
///
/// For an output type of your own whose `Default` is a suitable zero
/// value, use [`impl_sentinel_default!`](crate::impl_sentinel_default):
///
/// ```
/// use u_piecewise::impl_sentinel_default;
/// use u_piecewise::model::Sentinel;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Out { level: f64, count: u32 }
///
/// impl_sentinel_default!(Out);
///
/// assert_eq!(Out::sentinel(), Out::default());
/// ```
pub trait Sentinel {
    fn sentinel() -> Self;
}

macro_rules! impl_sentinel {
    ($value:expr => $($t:ty),*) => {$(
        impl Sentinel for $t {
            fn sentinel() -> Self { $value }
        }
    )*};
}

impl_sentinel!(f64::NAN => f64);
impl_sentinel!(f32::NAN => f32);
impl_sentinel!(0 => i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);
impl_sentinel!(false => bool);

impl<T> Sentinel for Vec<T> {
    fn sentinel() -> Self {
        Vec::new()
    }
}

impl<T> Sentinel for Option<T> {
    fn sentinel() -> Self {
        None
    }
}

impl Sentinel for String {
    fn sentinel() -> Self {
        String::new()
    }
}

impl<T: Sentinel, const N: usize> Sentinel for [T; N] {
    fn sentinel() -> Self {
        std::array::from_fn(|_| T::sentinel())
    }
}

macro_rules! impl_sentinel_tuple {
    ($($t:ident),*) => {
        impl<$($t: Sentinel),*> Sentinel for ($($t,)*) {
            fn sentinel() -> Self {
                ($($t::sentinel(),)*)
            }
        }
    };
}

impl_sentinel_tuple!();
impl_sentinel_tuple!(A);
impl_sentinel_tuple!(A, B);
impl_sentinel_tuple!(A, B, C);
impl_sentinel_tuple!(A, B, C, D);

/// Implements [`Sentinel`](crate::model::Sentinel) through `Default` for
/// each listed type.
#[macro_export]
macro_rules! impl_sentinel_default {
    ($($t:ty),+ $(,)?) => {$(
        impl $crate::model::Sentinel for $t {
            fn sentinel() -> Self {
                <$t as ::core::default::Default>::default()
            }
        }
    )+};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Reading {
        level: f64,
        flags: Vec<u8>,
    }

    crate::impl_sentinel_default!(Reading);

    #[test]
    fn test_scalar_sentinels() {
        assert!(f64::sentinel().is_nan());
        assert_eq!(i32::sentinel(), 0);
        assert!(!bool::sentinel());
        assert_eq!(String::sentinel(), "");
    }

    #[test]
    fn test_compound_sentinels() {
        let (x, n): (f64, u8) = Sentinel::sentinel();
        assert!(x.is_nan());
        assert_eq!(n, 0);
        assert_eq!(<[u32; 3]>::sentinel(), [0, 0, 0]);
        let () = <()>::sentinel();
    }

    #[test]
    fn test_default_backed_sentinel() {
        assert_eq!(Reading::sentinel(), Reading::default());
    }
}
