use redaction_domain::StorageError;

const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

// Azurite's well-known development account.
const DEV_ACCOUNT: &str = "devstoreaccount1";
const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

#[derive(Debug, Clone)]
pub enum BlobCredentials {
    SharedKey { account: String, key: String },
    Sas { token: String },
}

/// Parsed form of an Azure storage connection string.
#[derive(Debug, Clone)]
pub struct BlobConnection {
    pub endpoint: String,
    pub credentials: BlobCredentials,
}

impl BlobConnection {
    pub fn parse(connection_string: &str) -> Result<Self, StorageError> {
        let mut account = None;
        let mut account_key = None;
        let mut endpoint_suffix = None;
        let mut blob_endpoint = None;
        let mut sas_token = None;
        let mut development = false;

        for pair in connection_string.split(';') {
            // Account keys are base64 and may themselves contain '=', so only
            // the first '=' separates name from value.
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            match name.trim() {
                "AccountName" => account = Some(value.to_string()),
                "AccountKey" => account_key = Some(value.to_string()),
                "EndpointSuffix" => endpoint_suffix = Some(value.to_string()),
                "BlobEndpoint" => blob_endpoint = Some(value.trim_end_matches('/').to_string()),
                "SharedAccessSignature" => {
                    sas_token = Some(value.trim_start_matches('?').to_string());
                }
                "UseDevelopmentStorage" => development = value.trim() == "true",
                _ => {}
            }
        }

        if development {
            return Ok(Self {
                endpoint: DEV_BLOB_ENDPOINT.to_string(),
                credentials: BlobCredentials::SharedKey {
                    account: DEV_ACCOUNT.to_string(),
                    key: DEV_ACCOUNT_KEY.to_string(),
                },
            });
        }

        let endpoint = match (blob_endpoint, &account) {
            (Some(endpoint), _) => endpoint,
            (None, Some(account)) => format!(
                "https://{account}.blob.{}",
                endpoint_suffix.as_deref().unwrap_or(DEFAULT_ENDPOINT_SUFFIX)
            ),
            (None, None) => {
                return Err(StorageError::Connection(
                    "connection string names no account and no blob endpoint".to_string(),
                ));
            }
        };

        let credentials = match (account, account_key, sas_token) {
            (_, _, Some(token)) => BlobCredentials::Sas { token },
            (Some(account), Some(key), None) => BlobCredentials::SharedKey { account, key },
            _ => {
                return Err(StorageError::Connection(
                    "connection string carries neither an account key nor a SAS token".to_string(),
                ));
            }
        };

        Ok(Self {
            endpoint,
            credentials,
        })
    }

    pub fn container_url(&self, container: &str) -> String {
        let mut url = format!("{}/{container}?restype=container", self.endpoint);
        if let BlobCredentials::Sas { token } = &self.credentials {
            url.push('&');
            url.push_str(token);
        }
        url
    }

    pub fn blob_url(&self, container: &str, blob: &str) -> String {
        let mut url = format!("{}/{container}/{blob}", self.endpoint);
        if let BlobCredentials::Sas { token } = &self.credentials {
            url.push('?');
            url.push_str(token);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "c2VjcmV0LWtleQ==";

    #[test]
    fn shared_key_form_builds_the_account_endpoint() {
        let connection = BlobConnection::parse(&format!(
            "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey={KEY};EndpointSuffix=core.windows.net"
        ))
        .expect("valid connection string");

        assert_eq!(connection.endpoint, "https://acct.blob.core.windows.net");
        match connection.credentials {
            BlobCredentials::SharedKey { account, key } => {
                assert_eq!(account, "acct");
                assert_eq!(key, KEY);
            }
            other => panic!("expected shared key credentials, got {other:?}"),
        }
    }

    #[test]
    fn endpoint_suffix_defaults_when_absent() {
        let connection =
            BlobConnection::parse(&format!("AccountName=acct;AccountKey={KEY}"))
                .expect("valid connection string");
        assert_eq!(connection.endpoint, "https://acct.blob.core.windows.net");
    }

    #[test]
    fn explicit_blob_endpoint_wins() {
        let connection = BlobConnection::parse(&format!(
            "BlobEndpoint=https://edge.example.com/store/;AccountName=acct;AccountKey={KEY}"
        ))
        .expect("valid connection string");
        assert_eq!(connection.endpoint, "https://edge.example.com/store");
    }

    #[test]
    fn sas_token_credentials_are_query_appended() {
        let connection = BlobConnection::parse(
            "BlobEndpoint=https://acct.blob.core.windows.net;SharedAccessSignature=?sv=2021&sig=abc",
        )
        .expect("valid connection string");

        assert_eq!(
            connection.container_url("cleaned-transcriptions"),
            "https://acct.blob.core.windows.net/cleaned-transcriptions?restype=container&sv=2021&sig=abc"
        );
        assert_eq!(
            connection.blob_url("cleaned-transcriptions", "T1_cleaned.txt"),
            "https://acct.blob.core.windows.net/cleaned-transcriptions/T1_cleaned.txt?sv=2021&sig=abc"
        );
    }

    #[test]
    fn development_storage_uses_the_azurite_account() {
        let connection =
            BlobConnection::parse("UseDevelopmentStorage=true").expect("valid connection string");
        assert_eq!(connection.endpoint, "http://127.0.0.1:10000/devstoreaccount1");
        assert!(matches!(
            connection.credentials,
            BlobCredentials::SharedKey { ref account, .. } if account == "devstoreaccount1"
        ));
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let error = BlobConnection::parse("AccountName=acct").expect_err("no key, no sas");
        assert!(matches!(error, StorageError::Connection(_)));

        let error = BlobConnection::parse("garbage").expect_err("nothing usable");
        assert!(matches!(error, StorageError::Connection(_)));
    }

    #[test]
    fn shared_key_urls_carry_no_query_credentials() {
        let connection = BlobConnection::parse(&format!("AccountName=acct;AccountKey={KEY}"))
            .expect("valid connection string");
        assert_eq!(
            connection.container_url("c"),
            "https://acct.blob.core.windows.net/c?restype=container"
        );
        assert_eq!(
            connection.blob_url("c", "b.txt"),
            "https://acct.blob.core.windows.net/c/b.txt"
        );
    }
}
