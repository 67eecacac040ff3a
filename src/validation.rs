//! Checks on data handed to us by collaborators.

/// Extracts the single item of a collection that must contain exactly one.
pub(crate) trait ExactlyOne<T> {
    /// Returns the item, or the number of items found otherwise.
    fn exactly_one(self) -> Result<T, usize>;
}

impl<I> ExactlyOne<I::Item> for I
where
    I: IntoIterator,
{
    fn exactly_one(self) -> Result<I::Item, usize> {
        let mut items = self.into_iter();
        match (items.next(), items.next()) {
            (Some(item), None) => Ok(item),
            (None, _) => Err(0),
            (Some(_), Some(_)) => Err(2 + items.count()),
        }
    }
}
