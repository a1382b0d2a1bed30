//! `mockall` mocks of the collection seams.

use eventflow_core::data::{Actor, ActorId, GraphData};
use eventflow_core::traits::ActorRef;
use mockall::mock;

mock! {
    pub GraphLoader {}

    impl eventflow_core::traits::GraphLoader for GraphLoader {
        fn load_graph(&self, actor: ActorId) -> anyhow::Result<GraphData>;
    }
}

mock! {
    pub ActorResolver {}

    impl eventflow_core::traits::ActorResolver for ActorResolver {
        fn resolve(&self, reference: &ActorRef) -> Actor;
    }
}
