pub mod anime_repository_impl;
pub mod anime_tag_linker;
pub mod mapper;
pub mod query_builder;
pub mod tag_synchronizer;

pub use anime_repository_impl::AnimeRepositoryImpl;
pub use anime_tag_linker::AnimeTagLinker;
pub use query_builder::{AnimeQueryBuilder, BuiltQuery, QueryArg};
pub use tag_synchronizer::TagSynchronizer;
