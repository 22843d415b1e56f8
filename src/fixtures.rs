#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::coerce::TextCodec;
    use crate::duration::{format_duration, parse_duration};
    use crate::types::Kind;
    use crate::Record;

    /// A duration that travels through files as text (`"10s"`).
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub struct Interval(pub Duration);

    impl TextCodec for Interval {
        const KIND: Kind = Kind::Integer;

        fn decode(raw: &str) -> Result<Self, String> {
            parse_duration(raw).map(Interval)
        }

        fn encode(&self) -> String {
            format_duration(self.0)
        }

        fn is_empty(&self) -> bool {
            self.0.is_zero()
        }
    }

    impl Serialize for Interval {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.encode())
        }
    }

    impl<'de> Deserialize<'de> for Interval {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let raw = String::deserialize(deserializer)?;
            Interval::decode(&raw).map_err(serde::de::Error::custom)
        }
    }

    #[derive(Record, Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
    #[serde(default)]
    pub struct Server {
        #[tag(required = "true")]
        pub name: String,

        #[tag(default = "6060")]
        pub port: u16,

        pub id: i64,

        pub labels: Vec<i32>,

        pub enabled: bool,

        pub users: Vec<String>,

        #[field(nested)]
        pub postgres: Postgres,

        #[serde(skip)]
        #[allow(dead_code)]
        unexported: String,

        pub interval: Interval,
    }

    /// Postgres connection settings.
    #[derive(Record, Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
    #[serde(default)]
    pub struct Postgres {
        #[tag(env)]
        pub enabled: bool,

        #[tag(required = "true", customRequired = "yes")]
        pub port: u16,

        #[tag(required = "true")]
        pub hosts: Vec<String>,

        #[tag(default = "configdb")]
        pub db_name: String,

        pub availability_ratio: f64,

        pub options: HashMap<String, String>,

        #[field(skip)]
        #[serde(skip)]
        pub pool: Option<u32>,

        #[serde(skip)]
        #[allow(dead_code)]
        unexported: String,
    }

    /// The fully populated server used by file loading tests.
    pub fn populated_server() -> Server {
        Server {
            name: "koding".into(),
            port: 6060,
            id: 1234567890,
            labels: vec![123, 456],
            enabled: true,
            users: vec!["ankara".into(), "istanbul".into()],
            postgres: Postgres {
                enabled: true,
                port: 5432,
                hosts: vec![
                    "192.168.2.1".into(),
                    "192.168.2.2".into(),
                    "192.168.2.3".into(),
                ],
                db_name: "configdb".into(),
                availability_ratio: 8.23,
                ..Postgres::default()
            },
            interval: Interval(Duration::from_secs(10)),
            ..Server::default()
        }
    }

    pub const SERVER_JSON: &str = r#"{
        "name": "koding",
        "port": 6060,
        "id": 1234567890,
        "labels": [123, 456],
        "enabled": true,
        "users": ["ankara", "istanbul"],
        "interval": "10s",
        "postgres": {
            "enabled": true,
            "port": 5432,
            "hosts": ["192.168.2.1", "192.168.2.2", "192.168.2.3"],
            "db_name": "configdb",
            "availability_ratio": 8.23
        }
    }"#;

    pub const SERVER_YAML: &str = r#"
name: koding
port: 6060
id: 1234567890
labels:
  - 123
  - 456
enabled: true
users:
  - ankara
  - istanbul
interval: 10s
postgres:
  enabled: true
  port: 5432
  hosts:
    - 192.168.2.1
    - 192.168.2.2
    - 192.168.2.3
  db_name: configdb
  availability_ratio: 8.23
"#;

    pub const SERVER_TOML: &str = r#"
name = "koding"
port = 6060
id = 1234567890
labels = [123, 456]
enabled = true
users = ["ankara", "istanbul"]
interval = "10s"

[postgres]
enabled = true
port = 5432
hosts = ["192.168.2.1", "192.168.2.2", "192.168.2.3"]
db_name = "configdb"
availability_ratio = 8.23
"#;

    // -- Environment naming fixture ---------------------------------------------

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct ServerEnv {
        #[field(rename = "ServerPort")]
        #[tag(env)]
        pub server_port: u16,

        #[field(rename = "UserName")]
        #[tag(env)]
        pub user_name: String,

        #[field(rename = "IsEnabled")]
        #[tag(env)]
        pub is_enabled: bool,

        #[field(nested, rename = "MySql")]
        pub my_sql: MySql,
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct MySql {
        #[field(rename = "Host")]
        #[tag(env = "MYSQL_HOST")]
        pub host: String,

        #[field(rename = "Enabled")]
        #[tag(env)]
        pub enabled: bool,

        #[field(rename = "Port")]
        #[tag(required = "true", customRequired = "yes")]
        pub port: u16,

        #[field(rename = "Hosts")]
        #[tag(required = "true")]
        pub hosts: Vec<String>,

        #[field(rename = "DBName")]
        #[tag(default = "configdb")]
        pub db_name: String,

        #[field(rename = "AvailabilityRatio")]
        pub availability_ratio: f64,

        unexported: String,
    }

    // -- Deeply nested fixture --------------------------------------------------

    #[derive(Record, Debug, Default)]
    pub struct Deep {
        #[field(nested, rename = "A")]
        pub a: DeepA,
    }

    #[derive(Record, Debug, Default)]
    pub struct DeepA {
        #[field(nested, rename = "B")]
        pub b: DeepB,

        #[field(rename = "Label")]
        pub label: String,
    }

    #[derive(Record, Debug, Default)]
    pub struct DeepB {
        #[field(rename = "C")]
        #[tag(required = "true")]
        pub c: String,
    }

    #[test]
    fn interval_codec_round_trips_through_text() {
        let interval = Interval::decode("1h30m").unwrap();
        assert_eq!(interval.0, Duration::from_secs(5400));
        assert_eq!(interval.encode(), "1h30m");
        assert!(Interval::default().is_empty());
    }

    #[test]
    fn json_fixture_matches_populated_server() {
        let parsed: Server = serde_json::from_str(SERVER_JSON).unwrap();
        assert_eq!(parsed, populated_server());
    }
}
