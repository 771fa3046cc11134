// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Annotation input model

pub mod declaration;
pub mod resolver;
pub mod value;

pub use self::declaration::{
    AttachmentPoint, CompilationUnit, Declaration, FunctionDecl, InlineListener, ListenerBinding,
    ListenerDecl, ListenerInfo, SecureSocket, ServiceDecl, StoreConfig, ENTRY_POINT,
};
pub use self::resolver::{Placeholders, ValueResolver, PROPERTY_USER_HOME};
pub use self::value::{Annotation, AnnotationKind, AnnotationValue};
