use crate::model::{Breakpoint, Location, Source};
use std::borrow::Cow;

/// Maps a breakpoint to the location the panel should attribute it to.
pub trait LocationResolver {
    fn resolve<'a>(&self, breakpoint: &'a Breakpoint, selected: Option<&Source>) -> Cow<'a, Location>;
}

/// Uses the generated location while a generated source is selected,
/// the original location otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectedLocation;

impl LocationResolver for SelectedLocation {
    fn resolve<'a>(&self, breakpoint: &'a Breakpoint, selected: Option<&Source>) -> Cow<'a, Location> {
        match selected {
            Some(source) if source.id.is_generated() => {
                Cow::Borrowed(breakpoint.generated_or_original())
            }
            _ => Cow::Borrowed(&breakpoint.location),
        }
    }
}

impl<F> LocationResolver for F
where
    F: Fn(&Breakpoint, Option<&Source>) -> Location,
{
    fn resolve<'a>(&self, breakpoint: &'a Breakpoint, selected: Option<&Source>) -> Cow<'a, Location> {
        Cow::Owned(self(breakpoint, selected))
    }
}
