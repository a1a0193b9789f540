use std::ops::{Add, Div};

use crate::quantities::Float;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoItems;

pub trait Average: Sized {
    type Aggregator;
    type Output;

    fn new_aggregator() -> Self::Aggregator;

    fn aggregate(aggregator: Self::Aggregator, next: Self) -> Self::Aggregator;

    fn average(aggregator: Self::Aggregator) -> Self::Output;
}

impl<T> Average for T
where
    T: Add<T, Output = T> + Div<Float, Output = T>,
{
    type Aggregator = Option<(T, usize)>;
    type Output = Result<T, NoItems>;

    fn new_aggregator() -> Self::Aggregator {
        None
    }

    fn aggregate(aggregator: Self::Aggregator, next: Self) -> Self::Aggregator {
        match aggregator {
            Some((total, count)) => Some((total + next, count + 1)),
            None => Some((next, 1)),
        }
    }

    fn average(aggregator: Self::Aggregator) -> Self::Output {
        #[allow(clippy::cast_precision_loss)]
        match aggregator {
            Some((total, count)) => Ok(total / count as Float),
            None => Err(NoItems),
        }
    }
}

pub trait IterAverage<T>
where
    T: Average,
{
    fn average(self) -> T::Output;
}

impl<T, I> IterAverage<T> for I
where
    I: IntoIterator<Item = T>,
    T: Average,
{
    fn average(self) -> <T as Average>::Output {
        T::average(self.into_iter().fold(T::new_aggregator(), T::aggregate))
    }
}

#[cfg(test)]
mod tests {
    use crate::quantities::{seconds, Float};

    use super::{IterAverage, NoItems};

    #[test]
    fn empty() {
        assert_eq!(Vec::<Float>::new().average(), Err(NoItems));
    }

    #[test]
    fn mean_of_spans() {
        let waits = vec![seconds(0.25), seconds(0.75), seconds(0.5)];
        assert_eq!(waits.average(), Ok(seconds(0.5)));
    }
}
