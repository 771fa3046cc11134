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

use super::{annotation_keys, recognized, AnnotationProcessor, ProcessorContext};
use crate::domain::annotation::{
    Annotation, AnnotationKind, ListenerBinding, ListenerDecl, ServiceDecl,
};
use crate::domain::model::naming::{derived_name, ensure_valid_name};
use crate::domain::model::{GatewayModel, GatewayServer, HttpRoute, VirtualServiceModel};
use crate::infrastructure::constants::{SUFFIX_ISTIO_GATEWAY, SUFFIX_ISTIO_VIRTUAL_SERVICE};
use crate::shared::error::{KubeError, Result};

annotation_keys! {
    enum GatewayKey {
        Name => "name",
        Namespace => "namespace",
        Labels => "labels",
        Annotations => "annotations",
        Selector => "selector",
        Servers => "servers",
    }
}

annotation_keys! {
    enum VirtualServiceKey {
        Name => "name",
        Namespace => "namespace",
        Labels => "labels",
        Annotations => "annotations",
        Hosts => "hosts",
        Gateways => "gateways",
        Http => "http",
    }
}

/// Listener whose Service a service declaration routes to.
pub(super) fn bound_listener(service: &ServiceDecl) -> &str {
    match &service.listener {
        ListenerBinding::Named(listener) => listener,
        ListenerBinding::Anonymous(_) => &service.name,
    }
}

pub struct IstioGatewayProcessor;

impl IstioGatewayProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        identifier: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let resolver = ctx.resolver;
        let mut gateway = GatewayModel::new(derived_name(identifier, SUFFIX_ISTIO_GATEWAY));

        for (key, field, value) in recognized::<GatewayKey>(self.kind().as_str(), &annotation.fields) {
            match key {
                GatewayKey::Name => gateway.name = resolver.string(field, value)?,
                GatewayKey::Namespace => gateway.namespace = Some(resolver.string(field, value)?),
                GatewayKey::Labels => gateway.labels = resolver.string_map(field, value)?,
                GatewayKey::Annotations => gateway.annotations = resolver.string_map(field, value)?,
                GatewayKey::Selector => gateway.selector = resolver.string_map(field, value)?,
                GatewayKey::Servers => {
                    gateway.servers = resolver.decode::<Vec<GatewayServer>>(
                        field,
                        value,
                        "list of gateway servers",
                    )?
                }
            }
        }

        if gateway.servers.is_empty() {
            gateway.servers.push(GatewayServer::default_http());
        }
        if let Some(server) = gateway.servers.iter().find(|s| s.hosts.is_empty()) {
            return Err(KubeError::malformed(
                format!("servers[{}].hosts", server.port.name),
                "at least one host",
            ));
        }
        ensure_valid_name("Gateway", &gateway.name)?;
        ctx.holder.add_gateway(gateway)
    }
}

impl AnnotationProcessor for IstioGatewayProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::IstioGateway
    }

    fn process_service(
        &self,
        ctx: &mut ProcessorContext<'_>,
        service: &ServiceDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &service.name, annotation)
    }

    fn process_listener(
        &self,
        ctx: &mut ProcessorContext<'_>,
        listener: &ListenerDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &listener.name, annotation)
    }
}

pub struct IstioVirtualServiceProcessor;

impl IstioVirtualServiceProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        identifier: &str,
        listener: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let resolver = ctx.resolver;
        let mut virtual_service =
            VirtualServiceModel::new(derived_name(identifier, SUFFIX_ISTIO_VIRTUAL_SERVICE), listener);

        for (key, field, value) in
            recognized::<VirtualServiceKey>(self.kind().as_str(), &annotation.fields)
        {
            match key {
                VirtualServiceKey::Name => virtual_service.name = resolver.string(field, value)?,
                VirtualServiceKey::Namespace => {
                    virtual_service.namespace = Some(resolver.string(field, value)?)
                }
                VirtualServiceKey::Labels => virtual_service.labels = resolver.string_map(field, value)?,
                VirtualServiceKey::Annotations => {
                    virtual_service.annotations = resolver.string_map(field, value)?
                }
                VirtualServiceKey::Hosts => virtual_service.hosts = resolver.string_list(field, value)?,
                VirtualServiceKey::Gateways => {
                    virtual_service.gateways = resolver.string_list(field, value)?
                }
                VirtualServiceKey::Http => {
                    virtual_service.http =
                        resolver.decode::<Vec<HttpRoute>>(field, value, "list of HTTP routes")?
                }
            }
        }

        ensure_valid_name("VirtualService", &virtual_service.name)?;
        ctx.holder.add_virtual_service(virtual_service)
    }
}

impl AnnotationProcessor for IstioVirtualServiceProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::IstioVirtualService
    }

    fn process_service(
        &self,
        ctx: &mut ProcessorContext<'_>,
        service: &ServiceDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &service.name, bound_listener(service), annotation)
    }

    fn process_listener(
        &self,
        ctx: &mut ProcessorContext<'_>,
        listener: &ListenerDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &listener.name, &listener.name, annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::annotation::{AnnotationValue, Placeholders, ValueResolver};
    use crate::domain::context::DataHolder;
    use std::path::Path;

    fn listener() -> ListenerDecl {
        ListenerDecl {
            name: "helloEP".to_string(),
            port: 9090,
            secure_socket: None,
            annotations: Vec::new(),
        }
    }

    #[test]
    fn test_gateway_defaults() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        IstioGatewayProcessor
            .process_listener(&mut ctx, &listener(), &Annotation::new(AnnotationKind::IstioGateway))
            .unwrap();

        let gateway = &holder.gateways()[0];
        assert_eq!(gateway.name, "helloep-istio-gw");
        assert_eq!(gateway.selector.get("istio").map(String::as_str), Some("ingressgateway"));
        assert_eq!(gateway.servers.len(), 1);
        assert_eq!(gateway.servers[0].port.number, 80);
        assert_eq!(gateway.servers[0].hosts, vec!["*".to_string()]);
    }

    #[test]
    fn test_gateway_server_schema_is_strict() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let servers = AnnotationValue::List(vec![AnnotationValue::record([
            (
                "port",
                AnnotationValue::record([
                    ("number", AnnotationValue::from(443i64)),
                    ("name", AnnotationValue::from("https")),
                    ("protocol", AnnotationValue::from("HTTPS")),
                ]),
            ),
            ("hostz", AnnotationValue::from(vec!["*"])),
        ])]);
        let annotation = Annotation::new(AnnotationKind::IstioGateway).with("servers", servers);
        let err = IstioGatewayProcessor
            .process_listener(&mut ctx, &listener(), &annotation)
            .unwrap_err();
        assert!(matches!(err, KubeError::MalformedAnnotationValue { .. }));
    }

    #[test]
    fn test_virtual_service_on_service_with_named_listener() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let service = ServiceDecl {
            name: "hello".to_string(),
            listener: ListenerBinding::Named("helloEP".to_string()),
            annotations: Vec::new(),
        };
        let annotation = Annotation::new(AnnotationKind::IstioVirtualService)
            .with("gateways", vec!["my-gateway"]);
        IstioVirtualServiceProcessor
            .process_service(&mut ctx, &service, &annotation)
            .unwrap();

        let vs = &holder.virtual_services()[0];
        assert_eq!(vs.name, "hello-istio-vs");
        assert_eq!(vs.listener_name, "helloEP");
        assert_eq!(vs.hosts, vec!["*".to_string()]);
        assert_eq!(vs.gateways, vec!["my-gateway".to_string()]);
    }
}
