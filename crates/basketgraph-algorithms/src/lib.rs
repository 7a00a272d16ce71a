pub mod common;
pub mod community;
pub mod centrality;
pub mod topology;

pub use common::{GraphView, NodeId};
pub use community::{
    louvain, modularity, weakly_connected_components, LouvainConfig, LouvainResult, UnionFind,
    WccResult,
};
pub use centrality::{betweenness_centrality, BetweennessConfig};
pub use topology::{clustering_coefficients, count_triangles};
