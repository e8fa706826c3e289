use std::fmt;
use std::sync::Arc;

/// External data mapped into a series' native point type.
///
/// The mapping is re-evaluated whenever the owning series refreshes its data.
#[derive(Clone)]
pub struct ItemsSource<P> {
    load: Arc<dyn Fn() -> Vec<P> + Send + Sync>,
}

impl<P> ItemsSource<P> {
    /// Maps a fixed item list with `mapping`.
    pub fn from_items<T>(items: Vec<T>, mapping: impl Fn(&T) -> P + Send + Sync + 'static) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self {
            load: Arc::new(move || items.iter().map(&mapping).collect()),
        }
    }

    /// Pulls points from `loader` on every refresh.
    pub fn from_fn(loader: impl Fn() -> Vec<P> + Send + Sync + 'static) -> Self {
        Self {
            load: Arc::new(loader),
        }
    }

    #[must_use]
    pub fn load(&self) -> Vec<P> {
        (self.load)()
    }
}

impl<P> fmt::Debug for ItemsSource<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemsSource(<fn>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataPoint;

    struct Reading {
        minute: u32,
        celsius: f64,
    }

    #[test]
    fn mapping_is_applied_per_item() {
        let source = ItemsSource::from_items(
            vec![
                Reading {
                    minute: 1,
                    celsius: 20.5,
                },
                Reading {
                    minute: 2,
                    celsius: 21.0,
                },
            ],
            |reading| DataPoint::new(f64::from(reading.minute), reading.celsius),
        );
        assert_eq!(
            source.load(),
            vec![DataPoint::new(1.0, 20.5), DataPoint::new(2.0, 21.0)]
        );
    }
}
