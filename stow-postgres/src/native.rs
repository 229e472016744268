use crate::{DIALECT, PgResult, PostgresDriver, PostgresPool, ValueHolder};
use openssl::ssl::{SslConnector, SslFiletype, SslMethod, SslVerifyMode};
use postgres_openssl::MakeTlsConnector;
use std::{env, path::Path, pin::pin};
use stow_core::{
    Driver, Error, ErrorContext, Result, Row, RowLabeled, RowNames, Value, stream::StreamExt,
    strip_url_scheme, truncate_long,
};
use tokio::spawn;
use tokio_postgres::{Client, NoTls};
use url::Url;
use urlencoding::decode;

/// [`PostgresPool`] over a `tokio-postgres` client.
///
/// The client pipelines concurrent queries, statements share it without locking.
pub struct PostgresNative {
    client: Client,
}

fn decode_row(row: tokio_postgres::Row) -> Result<Row> {
    (0..row.len())
        .map(|i| match row.try_get::<_, ValueHolder>(i) {
            Ok(v) => Ok(v.0),
            Err(e) => {
                let column = &row.columns()[i];
                Err(Error::new(e).context(format!(
                    "Could not decode column {} `{}` of type {}",
                    i,
                    column.name(),
                    column.type_()
                )))
            }
        })
        .collect()
}

impl PostgresNative {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects to a `postgres://` url.
    ///
    /// The `sslmode` parameter (or `PGSSLMODE`) selects plain TCP (`disable`, the default)
    /// or TLS. With TLS, `sslrootcert`, `sslcert` and `sslkey` (or `PGSSLROOTCERT`,
    /// `PGSSLCERT`, `PGSSLKEY`) point to PEM files.
    pub async fn connect(url: &str) -> Result<Self> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let url = decode(url).with_context(context)?;
        strip_url_scheme(&url, PostgresDriver::<Self>::NAME, DIALECT).with_context(context)?;
        let mut url = Url::parse(&url).with_context(context)?;
        let mut take_url_param = |key: &str, env_var: &str| {
            let mut value = None;
            let mut pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(k, v)| (k.into(), v.into()))
                .collect();
            if let Some(pos) = pairs.iter().position(|(k, _)| k == key) {
                let (_, v) = pairs.remove(pos);
                value = Some(v);
            }
            if pairs.is_empty() {
                url.set_query(None);
            } else {
                url.query_pairs_mut()
                    .clear()
                    .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            }
            value.or_else(|| env::var(env_var).ok())
        };
        let sslmode = take_url_param("sslmode", "PGSSLMODE").unwrap_or("disable".into());
        let client = if sslmode == "disable" {
            let (client, connection) = tokio_postgres::connect(url.as_str(), NoTls)
                .await
                .with_context(context)?;
            spawn(async move {
                if let Err(e) = connection.await
                    && !e.is_closed()
                {
                    log::error!("Postgres connection error: {:#}", e);
                }
            });
            client
        } else {
            let mut builder = SslConnector::builder(SslMethod::tls())?;
            let root_cert = take_url_param("sslrootcert", "PGSSLROOTCERT");
            let cert = take_url_param("sslcert", "PGSSLCERT");
            let key = take_url_param("sslkey", "PGSSLKEY");
            if let Some(path) = root_cert.as_deref().map(Path::new)
                && path.exists()
            {
                builder.set_ca_file(path)?;
            }
            if let Some(path) = cert.as_deref().map(Path::new)
                && path.exists()
            {
                builder.set_certificate_chain_file(path)?;
            }
            if let Some(path) = key.as_deref().map(Path::new)
                && path.exists()
            {
                builder.set_private_key_file(path, SslFiletype::PEM)?;
            }
            match &*sslmode {
                "require" | "prefer" => builder.set_verify(SslVerifyMode::NONE),
                _ => builder.set_verify(SslVerifyMode::PEER),
            }
            let mut connector = MakeTlsConnector::new(builder.build());
            if sslmode != "verify-full" {
                connector.set_callback(|config, _| {
                    config.set_verify_hostname(false);
                    Ok(())
                });
            }
            let (client, connection) = tokio_postgres::connect(url.as_str(), connector)
                .await
                .with_context(context)?;
            spawn(async move {
                if let Err(e) = connection.await
                    && !e.is_closed()
                {
                    log::error!("Postgres connection error: {:#}", e);
                }
            });
            client
        };
        Ok(Self::new(client))
    }
}

impl PostgresPool for PostgresNative {
    fn is_connected(&self) -> bool {
        !self.client.is_closed()
    }

    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<PgResult> {
        let stream = self
            .client
            .query_raw(sql, params.into_iter().map(ValueHolder))
            .await?;
        let mut stream = pin!(stream);
        let mut labels: Option<RowNames> = None;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await.transpose()? {
            let names = labels
                .get_or_insert_with(|| row.columns().iter().map(|c| c.name().into()).collect())
                .clone();
            rows.push(RowLabeled::new(names, decode_row(row)?));
        }
        let row_count = stream.rows_affected().unwrap_or(rows.len() as u64);
        Ok(PgResult { rows, row_count })
    }
}
