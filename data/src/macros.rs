#[macro_export]
macro_rules! tvec {
    // count helper: transform any expression into 1
    (@one $x:expr) => (1usize);
    ($elem:expr; $n:expr) => ({
        $crate::TVec::from_elem($elem, $n)
    });
    ($($x:expr),*$(,)*) => ({
        let count = 0usize $(+ $crate::tvec!(@one $x))*;
        #[allow(unused_mut)]
        let mut vec = $crate::TVec::new();
        if count <= vec.inline_size() {
            $(vec.push($x);)*
            vec
        } else {
            $crate::TVec::from_vec(vec![$($x,)*])
        }
    });
}

/// Builds a rank-known `TensorShape` from a list of dimensions, `?` standing
/// for an unknown one.
///
/// ```
/// # use dlspec_data::prelude::*;
/// let s = shape![2, ?, 4];
/// assert_eq!(s.rank(), Some(3));
/// assert_eq!(s.size(), None);
/// assert_eq!(shape![].size(), Some(1));
/// ```
#[macro_export]
macro_rules! shape {
    (@dim ?) => ($crate::prelude::DimValue::Unknown);
    (@dim $x:expr) => ($crate::prelude::DimValue::Known($x));
    ($($d:tt),* $(,)?) => ({
        let dims: $crate::TVec<$crate::prelude::DimValue> =
            $crate::tvec![$($crate::shape!(@dim $d)),*];
        $crate::prelude::TensorShape::known(dims)
    });
}
