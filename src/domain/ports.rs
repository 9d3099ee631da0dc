use crate::domain::model::Participant;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Load/save of the whole roster under a fixed key.
pub trait RosterStore: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Vec<Participant>>> + Send;
    fn save(
        &self,
        participants: &[Participant],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn roster_key(&self) -> &str;
    fn allow_repeat(&self) -> bool;
    fn group_size(&self) -> usize;
}

/// Produces decorative group names. May return fewer names than asked for.
#[async_trait]
pub trait NameGenerator: Send + Sync {
    async fn generate_names(&self, count: usize) -> Result<Vec<String>>;
}

#[async_trait]
impl<G: NameGenerator + ?Sized> NameGenerator for std::sync::Arc<G> {
    async fn generate_names(&self, count: usize) -> Result<Vec<String>> {
        (**self).generate_names(count).await
    }
}
