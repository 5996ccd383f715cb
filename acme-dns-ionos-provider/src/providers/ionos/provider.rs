//! IONOS DnsProvider trait implementation

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_domain_name, strip_txt_quotes};
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{CreateTxtRecordRequest, TxtRecord, Zone};

use super::{
    IonosProvider, IonosRecord, IonosRecordCreate, IonosZone, IonosZoneDetail, PROVIDER_NAME,
    ZONES_PATH,
};

const TXT: &str = "TXT";

impl IonosProvider {
    fn to_txt_record(record: IonosRecord, zone_id: &str) -> TxtRecord {
        TxtRecord {
            id: record.id,
            zone_id: zone_id.to_string(),
            name: normalize_domain_name(&record.name),
            content: strip_txt_quotes(&record.content).to_string(),
            ttl: record.ttl,
            disabled: record.disabled,
            changed_at: record.change_date,
        }
    }
}

#[async_trait]
impl DnsProvider for IonosProvider {
    fn id(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let zones: Vec<IonosZone> = self.get(ZONES_PATH, ErrorContext::default()).await?;
        log::debug!("[{PROVIDER_NAME}] Account has {} zone(s)", zones.len());
        Ok(zones
            .into_iter()
            .map(|z| Zone::new(z.id, normalize_domain_name(&z.name)))
            .collect())
    }

    async fn create_txt_record(&self, req: &CreateTxtRecordRequest) -> Result<TxtRecord> {
        let name = normalize_domain_name(&req.name);
        let body = [IonosRecordCreate {
            name: &name,
            record_type: TXT,
            content: &req.content,
            ttl: req.ttl,
            prio: 0,
            disabled: false,
        }];
        let context = ErrorContext {
            record_name: Some(name.clone()),
            domain: Some(req.zone_id.clone()),
            ..Default::default()
        };

        let created: Vec<IonosRecord> = self
            .post(&format!("{ZONES_PATH}/{}/records", req.zone_id), &body, context)
            .await?;

        let record = created
            .into_iter()
            .next()
            .ok_or_else(|| self.parse_error("Create response contained no record"))?;

        log::info!(
            "[{PROVIDER_NAME}] Created TXT record {} ({name}) in zone {}",
            record.id,
            req.zone_id
        );
        Ok(Self::to_txt_record(record, &req.zone_id))
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let context = ErrorContext {
            record_id: Some(record_id.to_string()),
            domain: Some(zone_id.to_string()),
            ..Default::default()
        };

        match self
            .delete(&format!("{ZONES_PATH}/{zone_id}/records/{record_id}"), context)
            .await
        {
            Ok(()) => {
                log::info!("[{PROVIDER_NAME}] Deleted record {record_id} in zone {zone_id}");
                Ok(())
            }
            Err(ProviderError::RecordNotFound { .. }) => {
                log::debug!("[{PROVIDER_NAME}] Record {record_id} already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn find_txt_records(&self, zone_id: &str, name: &str) -> Result<Vec<TxtRecord>> {
        let wanted = normalize_domain_name(name);
        let path = format!(
            "{ZONES_PATH}/{zone_id}?recordName={}&recordType={TXT}",
            urlencoding::encode(&wanted)
        );
        let context = ErrorContext {
            domain: Some(zone_id.to_string()),
            ..Default::default()
        };

        let detail: IonosZoneDetail = self.get(&path, context).await?;

        // The query filters server-side; the check is repeated in case it is ignored
        Ok(detail
            .records
            .into_iter()
            .filter(|r| {
                r.record_type.eq_ignore_ascii_case(TXT) && normalize_domain_name(&r.name) == wanted
            })
            .map(|r| Self::to_txt_record(r, zone_id))
            .collect())
    }
}
