// Copyright (c) 2016-2021 Fabian Schuiki

//! Traits shared by the syntax nodes of the front-ends.

#![deny(missing_docs)]

use crate::source::Location;

/// A syntax node that knows where it starts in the source text.
pub trait HasLocation {
    /// The line and column of the first token of this node.
    fn location(&self) -> Location;
}

/// A syntax node that can be named in messages to the user.
pub trait HasDesc {
    /// A short noun describing the kind of node, e.g. "module".
    fn desc(&self) -> &'static str;

    /// Like `desc`, but including the node's name where it has one, e.g.
    /// "module `top`".
    fn desc_full(&self) -> String {
        self.desc().into()
    }
}
