use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Describes whether a resource's data is a sequence, for
/// [`AsyncResource::is_empty_result`](super::AsyncResource::is_empty_result).
///
/// Collections report their emptiness; every other shape uses the default
/// and is never an "empty result". Implement it with an empty body for
/// domain types:
///
/// ```
/// # use storefront::resource::ResultShape;
/// struct Profile;
/// impl ResultShape for Profile {}
/// ```
pub trait ResultShape {
    fn is_empty_sequence(&self) -> bool {
        false
    }
}

macro_rules! scalar_shape {
    ($($t:ty),* $(,)?) => {
        $(impl ResultShape for $t {})*
    };
}

scalar_shape!(
    (), bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
    str, String,
);

impl<T> ResultShape for [T] {
    fn is_empty_sequence(&self) -> bool {
        self.is_empty()
    }
}

impl<T, const N: usize> ResultShape for [T; N] {
    fn is_empty_sequence(&self) -> bool {
        N == 0
    }
}

impl<T> ResultShape for Vec<T> {
    fn is_empty_sequence(&self) -> bool {
        self.is_empty()
    }
}

impl<T> ResultShape for VecDeque<T> {
    fn is_empty_sequence(&self) -> bool {
        self.is_empty()
    }
}

impl<T> ResultShape for BTreeSet<T> {
    fn is_empty_sequence(&self) -> bool {
        self.is_empty()
    }
}

impl<T, S> ResultShape for HashSet<T, S> {
    fn is_empty_sequence(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> ResultShape for BTreeMap<K, V> {
    fn is_empty_sequence(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> ResultShape for HashMap<K, V, S> {
    fn is_empty_sequence(&self) -> bool {
        self.is_empty()
    }
}

impl<T: ResultShape + ?Sized> ResultShape for &T {
    fn is_empty_sequence(&self) -> bool {
        (**self).is_empty_sequence()
    }
}

impl<T: ResultShape + ?Sized> ResultShape for Box<T> {
    fn is_empty_sequence(&self) -> bool {
        (**self).is_empty_sequence()
    }
}

impl<T: ResultShape + ?Sized> ResultShape for std::sync::Arc<T> {
    fn is_empty_sequence(&self) -> bool {
        (**self).is_empty_sequence()
    }
}

impl<T: ResultShape> ResultShape for Option<T> {
    fn is_empty_sequence(&self) -> bool {
        self.as_ref().is_some_and(ResultShape::is_empty_sequence)
    }
}
