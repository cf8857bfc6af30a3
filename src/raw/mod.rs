mod arena;
mod deletion;
mod epoch;
mod handle;
mod insertion;
mod node;
mod raw_rb_tree;
mod rotation;
mod validate;
mod walk;

pub(crate) use epoch::Epoch;
pub(crate) use handle::Handle;
pub(crate) use raw_rb_tree::RawRbTree;
pub(crate) use walk::RawIter;
