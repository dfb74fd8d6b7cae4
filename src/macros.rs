/// A little macro that makes creating collections (e.g. hashmaps) a bit easier.
///
/// **Example**
/// ```
/// use std::collections::HashMap;
///
/// let map: HashMap<&str, &str> = gear_rental_backend::collection! {
///     "id" => "64f1a2"
/// };
/// ```
#[macro_export]
macro_rules! collection {
    // map-like
    ($($key:expr => $value:expr),* $(,)?) => {
        std::iter::Iterator::collect(IntoIterator::into_iter([$(($key, $value),)*]))
    };

    // set-like
    ($($value:expr),* $(,)?) => {
        std::iter::Iterator::collect(IntoIterator::into_iter([$($value,)*]))
    };
}
