use stegochannel_engine::{Post, PostId};

/// Social-network adapter seam: an embedder supplies the actual API calls
/// this trait abstracts over. Mirrors [`stegochannel_beacon::BeaconSource`]:
/// native `async fn` in trait, no boxed futures.
pub trait PostSource: Send + Sync {
    /// Returns posts by `author_id` newer than `since` (exclusive), oldest
    /// first. `since` is `None` on the very first call for a channel.
    fn recent_posts(
        &self,
        author_id: &str,
        since: Option<PostId>,
    ) -> impl std::future::Future<Output = Result<Vec<Post>, crate::Error>> + Send;
}
