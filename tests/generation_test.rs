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

#[cfg(test)]
mod tests {
    use base64::Engine;
    use kubegen::domain::annotation::{
        FunctionDecl, InlineListener, ListenerBinding, ListenerDecl, SecureSocket, ServiceDecl,
        StoreConfig,
    };
    use kubegen::domain::model::{DockerModel, RegistryCredentials};
    use kubegen::*;
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    /// Records builder calls instead of running docker.
    #[derive(Default, Clone)]
    struct RecordingBuilder {
        calls: Arc<Mutex<Vec<String>>>,
        fail_build: bool,
    }

    impl RecordingBuilder {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ImageBuilder for RecordingBuilder {
        async fn build(&self, docker_dir: &Path, model: &DockerModel) -> Result<String> {
            self.calls.lock().unwrap().push(format!("build {}", model.image));
            if self.fail_build {
                return Err(KubeError::ImageBuild {
                    image: model.image.clone(),
                    message: "daemon not reachable".to_string(),
                });
            }
            assert!(docker_dir.join("Dockerfile").exists());
            Ok("sha256:0123456789ab".to_string())
        }

        async fn push(
            &self,
            model: &DockerModel,
            credentials: Option<RegistryCredentials>,
        ) -> Result<()> {
            let user = credentials.map(|c| c.username).unwrap_or_default();
            self.calls
                .lock()
                .unwrap()
                .push(format!("push {} {}", model.image, user));
            Ok(())
        }
    }

    fn service(name: &str, listener: ListenerBinding, annotations: Vec<Annotation>) -> Declaration {
        Declaration::Service(ServiceDecl {
            name: name.to_string(),
            listener,
            annotations,
        })
    }

    fn anonymous(port: i32) -> ListenerBinding {
        ListenerBinding::Anonymous(InlineListener {
            port,
            secure_socket: None,
        })
    }

    fn listener(name: &str, port: i32, annotations: Vec<Annotation>) -> ListenerDecl {
        ListenerDecl {
            name: name.to_string(),
            port,
            secure_socket: None,
            annotations,
        }
    }

    fn documents(path: &Path) -> Vec<serde_yaml::Value> {
        let content = fs::read_to_string(path).unwrap();
        serde_yaml::Deserializer::from_str(&content)
            .map(|doc| serde_yaml::Value::deserialize(doc).unwrap())
            .collect()
    }

    fn document(path: &Path) -> serde_yaml::Value {
        let mut docs = documents(path);
        assert_eq!(docs.len(), 1, "expected a single document in {}", path.display());
        docs.remove(0)
    }

    async fn generate(
        name: &str,
        declarations: Vec<Declaration>,
        dir: &Path,
        builder: RecordingBuilder,
    ) -> Result<GenerationReport> {
        let artifact = dir.join(format!("{}.balx", name));
        fs::write(&artifact, b"compiled program").unwrap();

        let unit = CompilationUnit { declarations };
        let mut holder = DataHolder::new(name);
        process_unit(&unit, &mut holder, &Placeholders::default(), dir)?;

        let config = GenerationConfig::new(dir.join("kubernetes"), &artifact).with_source_root(dir);
        ArtifactManager::new(holder, config, Box::new(builder))
            .generate()
            .await
    }

    fn out(dir: &Path, file: &str) -> PathBuf {
        dir.join("kubernetes").join(file)
    }

    #[tokio::test]
    async fn test_service_on_anonymous_listener() {
        let dir = tempfile::tempdir().unwrap();
        let builder = RecordingBuilder::default();
        let declarations = vec![service(
            "hello",
            anonymous(9090),
            vec![Annotation::new(AnnotationKind::Service)],
        )];

        let report = generate("hello", declarations, dir.path(), builder.clone())
            .await
            .unwrap();

        let svc = document(&out(dir.path(), "hello_svc.yaml"));
        assert_eq!(svc["kind"].as_str(), Some("Service"));
        assert_eq!(svc["metadata"]["name"].as_str(), Some("hello-svc"));
        assert_eq!(svc["spec"]["type"].as_str(), Some("ClusterIP"));
        assert_eq!(svc["spec"]["ports"][0]["port"].as_i64(), Some(9090));
        assert_eq!(svc["spec"]["ports"][0]["targetPort"].as_i64(), Some(9090));
        assert_eq!(svc["spec"]["selector"]["app"].as_str(), Some("hello"));

        let deployment = document(&out(dir.path(), "hello_deployment.yaml"));
        assert_eq!(deployment["kind"].as_str(), Some("Deployment"));
        assert_eq!(deployment["metadata"]["name"].as_str(), Some("hello-deployment"));
        let container = &deployment["spec"]["template"]["spec"]["containers"][0];
        assert_eq!(container["image"].as_str(), Some("hello:latest"));
        assert_eq!(container["ports"][0]["containerPort"].as_i64(), Some(9090));
        assert_eq!(
            deployment["spec"]["selector"]["matchLabels"]["app"].as_str(),
            Some("hello")
        );

        let dockerfile = fs::read_to_string(out(dir.path(), "docker/Dockerfile")).unwrap();
        assert!(dockerfile.contains("EXPOSE 9090"));
        assert!(out(dir.path(), "docker/hello.balx").exists());

        assert_eq!(builder.calls(), vec!["build hello:latest".to_string()]);
        assert_eq!(report.image_id.as_deref(), Some("sha256:0123456789ab"));
        assert!(!report.pushed);
        assert_eq!(report.count("Service"), 1);
        assert_eq!(
            report.apply_commands,
            vec![format!("kubectl apply -f {}", dir.path().join("kubernetes").display())]
        );
    }

    #[tokio::test]
    async fn test_listener_secret_is_base64_encoded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cert.pem"), "-----BEGIN CERTIFICATE-----\n").unwrap();
        let secret = Annotation::new(AnnotationKind::Secret).with(
            "secrets",
            AnnotationValue::List(vec![AnnotationValue::record([
                ("mountPath", AnnotationValue::from("/home/ballerina/certs")),
                ("data", AnnotationValue::from(vec!["cert.pem"])),
            ])]),
        );
        let declarations = vec![Declaration::Listener(listener("helloWorld", 9090, vec![secret]))];

        generate("hello", declarations, dir.path(), RecordingBuilder::default())
            .await
            .unwrap();

        let doc = document(&out(dir.path(), "hello_secret.yaml"));
        assert_eq!(doc["metadata"]["name"].as_str(), Some("helloworld-secret"));
        let encoded = doc["data"]["cert.pem"].as_str().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded, b"-----BEGIN CERTIFICATE-----\n");

        let deployment = document(&out(dir.path(), "hello_deployment.yaml"));
        let pod = &deployment["spec"]["template"]["spec"];
        assert_eq!(
            pod["volumes"][0]["secret"]["secretName"].as_str(),
            Some("helloworld-secret")
        );
        assert_eq!(
            pod["containers"][0]["volumeMounts"][0]["mountPath"].as_str(),
            Some("/home/ballerina/certs")
        );
    }

    #[tokio::test]
    async fn test_two_config_files_fail_before_deployment() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ballerina.conf"), "[hello]\nport=9090\n").unwrap();
        let conf = || Annotation::new(AnnotationKind::ConfigMap).with("conf", "ballerina.conf");
        let declarations = vec![
            service("hello", anonymous(9090), vec![conf()]),
            Declaration::Function(FunctionDecl {
                name: "main".to_string(),
                annotations: vec![conf()],
            }),
        ];
        let builder = RecordingBuilder::default();

        let err = generate("hello", declarations, dir.path(), builder.clone())
            .await
            .unwrap_err();

        match err {
            KubeError::MultipleConfigFile { names } => assert_eq!(names.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!out(dir.path(), "hello_config_map.yaml").exists());
        assert!(!out(dir.path(), "hello_deployment.yaml").exists());
        assert!(builder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_config_file_injects_env_and_args() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ballerina.conf"), "[hello]\nport=9090\n").unwrap();
        let declarations = vec![service(
            "hello",
            anonymous(9090),
            vec![Annotation::new(AnnotationKind::ConfigMap).with("conf", "ballerina.conf")],
        )];

        generate("hello", declarations, dir.path(), RecordingBuilder::default())
            .await
            .unwrap();

        let config_map = document(&out(dir.path(), "hello_config_map.yaml"));
        assert_eq!(
            config_map["metadata"]["name"].as_str(),
            Some("hello-ballerina-conf-config-map")
        );
        assert_eq!(
            config_map["data"]["ballerina.conf"].as_str(),
            Some("[hello]\nport=9090\n")
        );

        let deployment = document(&out(dir.path(), "hello_deployment.yaml"));
        let env = &deployment["spec"]["template"]["spec"]["containers"][0]["env"][0];
        assert_eq!(env["name"].as_str(), Some("CONFIG_FILE"));
        assert_eq!(env["value"].as_str(), Some("/home/ballerina/conf/ballerina.conf"));

        let dockerfile = fs::read_to_string(out(dir.path(), "docker/Dockerfile")).unwrap();
        assert!(dockerfile.contains("CMD ballerina run --config ${CONFIG_FILE} hello.balx"));
    }

    #[tokio::test]
    async fn test_route_host_from_domain() {
        let dir = tempfile::tempdir().unwrap();
        let route = Annotation::new(AnnotationKind::OpenShiftRoute)
            .with("namespace", "ns")
            .with("host", AnnotationValue::record([("domain", "example.com")]));
        let declarations = vec![
            Declaration::Listener(listener(
                "fooEP",
                9090,
                vec![Annotation::new(AnnotationKind::Service)],
            )),
            service("foo", ListenerBinding::Named("fooEP".to_string()), vec![route]),
        ];

        let report = generate("foo", declarations, dir.path(), RecordingBuilder::default())
            .await
            .unwrap();

        let docs = documents(&dir.path().join("kubernetes/openshift/foo.yaml"));
        let route = docs
            .iter()
            .find(|d| d["kind"].as_str() == Some("Route"))
            .unwrap();
        assert_eq!(route["metadata"]["name"].as_str(), Some("foo-openshift-route"));
        assert_eq!(route["metadata"]["namespace"].as_str(), Some("ns"));
        assert_eq!(
            route["spec"]["host"].as_str(),
            Some("foo-openshift-route-ns.example.com")
        );
        assert_eq!(route["spec"]["to"]["name"].as_str(), Some("fooep-svc"));
        assert!(report.apply_commands.iter().any(|c| c.starts_with("oc apply -f")));
    }

    #[tokio::test]
    async fn test_hpa_defaults_from_replicas() {
        let dir = tempfile::tempdir().unwrap();
        let declarations = vec![service(
            "hello",
            anonymous(9090),
            vec![
                Annotation::new(AnnotationKind::Deployment).with("replicas", 3i64),
                Annotation::new(AnnotationKind::PodAutoscaler),
            ],
        )];

        generate("hello", declarations, dir.path(), RecordingBuilder::default())
            .await
            .unwrap();

        let hpa = document(&out(dir.path(), "hello_hpa.yaml"));
        assert_eq!(hpa["apiVersion"].as_str(), Some("autoscaling/v2"));
        assert_eq!(hpa["spec"]["minReplicas"].as_i64(), Some(3));
        assert_eq!(hpa["spec"]["maxReplicas"].as_i64(), Some(4));
        assert_eq!(
            hpa["spec"]["scaleTargetRef"]["name"].as_str(),
            Some("hello-deployment")
        );
    }

    #[tokio::test]
    async fn test_hpa_requires_deployment() {
        let dir = tempfile::tempdir().unwrap();
        let declarations = vec![Declaration::Function(FunctionDecl {
            name: "main".to_string(),
            annotations: vec![
                Annotation::new(AnnotationKind::Job),
                Annotation::new(AnnotationKind::PodAutoscaler),
            ],
        })];

        let err = generate("task", declarations, dir.path(), RecordingBuilder::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KubeError::ValidationError(_)));
        assert!(out(dir.path(), "task_job.yaml").exists());
        assert!(!out(dir.path(), "task_hpa.yaml").exists());
    }

    #[tokio::test]
    async fn test_ingress_tls_follows_listener_secrets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("keystore.p12"), b"\x30\x82keystore").unwrap();
        let mut endpoint = listener(
            "helloEP",
            9095,
            vec![
                Annotation::new(AnnotationKind::Service),
                Annotation::new(AnnotationKind::Ingress),
            ],
        );
        endpoint.secure_socket = Some(SecureSocket {
            key_store: Some(StoreConfig {
                path: "keystore.p12".to_string(),
                password: Some("ballerina".to_string()),
            }),
            trust_store: None,
        });

        generate(
            "hello",
            vec![Declaration::Listener(endpoint)],
            dir.path(),
            RecordingBuilder::default(),
        )
        .await
        .unwrap();

        let ingress = document(&out(dir.path(), "hello_ingress.yaml"));
        assert_eq!(ingress["metadata"]["name"].as_str(), Some("helloep-ingress"));
        assert_eq!(
            ingress["metadata"]["annotations"]["nginx.ingress.kubernetes.io/ssl-passthrough"]
                .as_str(),
            Some("true")
        );
        assert_eq!(ingress["spec"]["tls"][0]["hosts"][0].as_str(), Some("helloep.com"));
        let backend = &ingress["spec"]["rules"][0]["http"]["paths"][0]["backend"]["service"];
        assert_eq!(backend["name"].as_str(), Some("helloep-svc"));
        assert_eq!(backend["port"]["number"].as_i64(), Some(9095));

        let secret = document(&out(dir.path(), "hello_secret.yaml"));
        assert_eq!(secret["metadata"]["name"].as_str(), Some("helloep-keystore"));
    }

    #[tokio::test]
    async fn test_reserved_mount_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let claim = Annotation::new(AnnotationKind::PersistentVolumeClaim).with(
            "volumeClaims",
            AnnotationValue::List(vec![AnnotationValue::record([
                ("name", "data"),
                ("mountPath", "/ballerina/runtime"),
            ])]),
        );
        let declarations = vec![service("hello", anonymous(9090), vec![claim])];

        let err = generate("hello", declarations, dir.path(), RecordingBuilder::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KubeError::ReservedMountPath { .. }));
        assert!(!dir.path().join("kubernetes").exists());
    }

    #[tokio::test]
    async fn test_push_with_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let deployment = Annotation::new(AnnotationKind::Deployment)
            .with("image", "docker.example.com/team/hello:1.0")
            .with("push", true)
            .with("username", "alice")
            .with("password", "secret");
        let builder = RecordingBuilder::default();

        let report = generate(
            "hello",
            vec![service("hello", anonymous(9090), vec![deployment])],
            dir.path(),
            builder.clone(),
        )
        .await
        .unwrap();

        assert_eq!(
            builder.calls(),
            vec![
                "build docker.example.com/team/hello:1.0".to_string(),
                "push docker.example.com/team/hello:1.0 alice".to_string(),
            ]
        );
        assert!(report.pushed);
    }

    #[tokio::test]
    async fn test_build_failure_stops_push() {
        let dir = tempfile::tempdir().unwrap();
        let builder = RecordingBuilder {
            fail_build: true,
            ..Default::default()
        };
        let deployment = Annotation::new(AnnotationKind::Deployment).with("push", true);

        let err = generate(
            "hello",
            vec![service("hello", anonymous(9090), vec![deployment])],
            dir.path(),
            builder.clone(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, KubeError::ImageBuild { .. }));
        assert_eq!(builder.calls(), vec!["build hello:latest".to_string()]);
        assert!(out(dir.path(), "hello_deployment.yaml").exists());
    }

    #[tokio::test]
    async fn test_openshift_build_config_skips_local_build() {
        let dir = tempfile::tempdir().unwrap();
        let builder = RecordingBuilder::default();
        let declarations = vec![service(
            "hello",
            anonymous(9090),
            vec![Annotation::new(AnnotationKind::OpenShiftBuildConfig)],
        )];

        let report = generate("hello", declarations, dir.path(), builder.clone())
            .await
            .unwrap();

        assert!(builder.calls().is_empty());
        assert!(report.image_id.is_none());
        let docs = documents(&dir.path().join("kubernetes/openshift/hello.yaml"));
        let kinds: Vec<_> = docs.iter().filter_map(|d| d["kind"].as_str()).collect();
        assert_eq!(kinds, vec!["BuildConfig", "ImageStream"]);
        assert_eq!(
            docs[0]["spec"]["output"]["to"]["name"].as_str(),
            Some("hello:latest")
        );
    }

    #[tokio::test]
    async fn test_virtual_service_default_route() {
        let dir = tempfile::tempdir().unwrap();
        let declarations = vec![service(
            "hello",
            anonymous(9090),
            vec![
                Annotation::new(AnnotationKind::Service).with("port", 80i64),
                Annotation::new(AnnotationKind::IstioGateway),
                Annotation::new(AnnotationKind::IstioVirtualService),
            ],
        )];

        generate("hello", declarations, dir.path(), RecordingBuilder::default())
            .await
            .unwrap();

        let gateway = document(&out(dir.path(), "hello_istio_gateway.yaml"));
        assert_eq!(gateway["metadata"]["name"].as_str(), Some("hello-istio-gw"));
        assert_eq!(gateway["metadata"]["namespace"].as_str(), Some("default"));

        let vs = document(&out(dir.path(), "hello_istio_virtual_service.yaml"));
        let destination = &vs["spec"]["http"][0]["route"][0]["destination"];
        assert_eq!(destination["host"].as_str(), Some("hello-svc"));
        assert_eq!(destination["port"]["number"].as_i64(), Some(80));
    }

    #[tokio::test]
    async fn test_hpa_max_below_deployment_replicas() {
        let dir = tempfile::tempdir().unwrap();
        let declarations = vec![service(
            "hello",
            anonymous(9090),
            vec![
                Annotation::new(AnnotationKind::Deployment).with("replicas", 3i64),
                Annotation::new(AnnotationKind::PodAutoscaler).with("maxReplicas", 2i64),
            ],
        )];

        let err = generate("hello", declarations, dir.path(), RecordingBuilder::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KubeError::ValidationError(_)));
        assert!(!out(dir.path(), "hello_hpa.yaml").exists());
    }

    #[tokio::test]
    async fn test_default_image_from_mixed_case_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let builder = RecordingBuilder::default();
        let declarations = vec![service("helloService", anonymous(9090), Vec::new())];

        let report = generate("HelloWorld", declarations, dir.path(), builder.clone())
            .await
            .unwrap();

        assert_eq!(report.image, "helloworld:latest");
        assert_eq!(builder.calls(), vec!["build helloworld:latest".to_string()]);
        let deployment = document(&out(dir.path(), "HelloWorld_deployment.yaml"));
        assert_eq!(
            deployment["metadata"]["name"].as_str(),
            Some("helloworld-deployment")
        );
        assert_eq!(
            deployment["spec"]["template"]["spec"]["containers"][0]["image"].as_str(),
            Some("helloworld:latest")
        );
    }

    #[tokio::test]
    async fn test_container_port_is_listener_port() {
        let dir = tempfile::tempdir().unwrap();
        let declarations = vec![service(
            "hello",
            anonymous(9090),
            vec![Annotation::new(AnnotationKind::Service).with("port", 8080i64)],
        )];

        generate("hello", declarations, dir.path(), RecordingBuilder::default())
            .await
            .unwrap();

        let svc = document(&out(dir.path(), "hello_svc.yaml"));
        assert_eq!(svc["spec"]["ports"][0]["port"].as_i64(), Some(8080));
        assert_eq!(svc["spec"]["ports"][0]["targetPort"].as_i64(), Some(9090));
        let deployment = document(&out(dir.path(), "hello_deployment.yaml"));
        let ports = deployment["spec"]["template"]["spec"]["containers"][0]["ports"]
            .as_sequence()
            .unwrap();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0]["containerPort"].as_i64(), Some(9090));
    }

    #[tokio::test]
    async fn test_deployment_name_must_be_label() {
        let dir = tempfile::tempdir().unwrap();
        let deployment = Annotation::new(AnnotationKind::Deployment).with("name", "hello.v1");

        let err = generate(
            "hello",
            vec![service("hello", anonymous(9090), vec![deployment])],
            dir.path(),
            RecordingBuilder::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, KubeError::ValidationError(_)));
        assert!(!dir.path().join("kubernetes").exists());
    }

    #[tokio::test]
    async fn test_copy_files_with_same_name_collide() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["a", "b"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("data.txt"), sub).unwrap();
        }
        let copy_files = AnnotationValue::List(vec![
            AnnotationValue::record([
                ("sourceFile", "a/data.txt"),
                ("target", "/home/ballerina/a/data.txt"),
            ]),
            AnnotationValue::record([
                ("sourceFile", "b/data.txt"),
                ("target", "/home/ballerina/b/data.txt"),
            ]),
        ]);
        let deployment = Annotation::new(AnnotationKind::Deployment).with("copyFiles", copy_files);
        let builder = RecordingBuilder::default();

        let err = generate(
            "hello",
            vec![service("hello", anonymous(9090), vec![deployment])],
            dir.path(),
            builder.clone(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, KubeError::ValidationError(_)));
        assert!(!out(dir.path(), "docker/Dockerfile").exists());
        assert!(builder.calls().is_empty());
    }
}
