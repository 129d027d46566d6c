//! Transform lookup trait

use crate::core::{Timestamp, TransformStamped};
use crate::frames::LookupResult;

/// Query service for the relative pose of two frames
pub trait TransformLookup: Send + Sync {
    /// Pose of `child` expressed in `parent` at `time`.
    ///
    /// [`Timestamp::LATEST`] asks for the most recent time at which the whole
    /// chain between the two frames is known. The returned message carries
    /// `parent` as `frame_id` and `child` as `child_frame_id`.
    fn lookup_transform(
        &self,
        parent: &str,
        child: &str,
        time: Timestamp,
    ) -> LookupResult<TransformStamped>;
}
