//! Bidirectional mapping between long attribute names and their compact wire
//! form.
//!
//! The wire protocol abbreviates every attribute and resource name
//! (`resourceName` is sent as `rn`, `container` as `cnt`). The console shows
//! long names to the operator and sends short names to the server.
//!
//! Both lookups are total: a name missing from the table is returned unchanged,
//! because servers may define extension attributes. A leading `m2m:` prefix is
//! ignored when resolving a known name.
//!
//! ```
//! use onem2m_console::protocol::AttributeDictionary;
//!
//! let dict = AttributeDictionary::standard();
//! assert_eq!(dict.to_short("resourceName"), "rn");
//! assert_eq!(dict.to_long("rn"), "resourceName");
//! assert_eq!(dict.to_long("m2m:cnt"), "container");
//! assert_eq!(dict.to_long("vendorExt"), "vendorExt");
//! ```

use crate::error::{ConsoleError, Result};
use crate::protocol::headers::PREFIX;
use crate::protocol::{descriptions, templates, Operation, ResourceType};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Long/short attribute name tables, kept as exact inverses.
#[derive(Debug, Clone)]
pub struct AttributeDictionary {
    long_to_short: HashMap<&'static str, &'static str>,
    short_to_long: HashMap<&'static str, &'static str>,
}

impl AttributeDictionary {
    /// Build a dictionary from `(long, short)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Dictionary`] if a long name or a short name
    /// appears twice, since the reverse table could not be an inverse.
    pub fn from_pairs(pairs: &[(&'static str, &'static str)]) -> Result<Self> {
        let mut long_to_short = HashMap::with_capacity(pairs.len());
        let mut short_to_long = HashMap::with_capacity(pairs.len());

        for &(long, short) in pairs {
            if let Some(previous) = long_to_short.insert(long, short) {
                return Err(ConsoleError::Dictionary(format!(
                    "long name '{}' maps to both '{}' and '{}'",
                    long, previous, short
                )));
            }
            if let Some(previous) = short_to_long.insert(short, long) {
                return Err(ConsoleError::Dictionary(format!(
                    "short name '{}' maps to both '{}' and '{}'",
                    short, previous, long
                )));
            }
        }

        Ok(Self {
            long_to_short,
            short_to_long,
        })
    }

    /// The built-in oneM2M attribute table.
    ///
    /// # Panics
    ///
    /// Panics on first use if the built-in table is not bijective.
    pub fn standard() -> &'static AttributeDictionary {
        static STANDARD: OnceLock<AttributeDictionary> = OnceLock::new();
        STANDARD.get_or_init(|| {
            AttributeDictionary::from_pairs(LONG_TO_SHORT)
                .unwrap_or_else(|e| panic!("built-in attribute table is broken: {}", e))
        })
    }

    /// Translate a long name to its wire form. Unknown names pass through
    /// without their `m2m:` prefix.
    pub fn to_short<'a>(&'a self, long: &'a str) -> &'a str {
        let bare = long.strip_prefix(PREFIX).unwrap_or(long);
        self.long_to_short.get(bare).copied().unwrap_or(bare)
    }

    /// Translate a wire name to its long form. Unknown names pass through
    /// without their `m2m:` prefix.
    pub fn to_long<'a>(&'a self, short: &'a str) -> &'a str {
        let bare = short.strip_prefix(PREFIX).unwrap_or(short);
        self.short_to_long.get(bare).copied().unwrap_or(bare)
    }

    /// Whether `long` is a known long name.
    pub fn contains_long(&self, long: &str) -> bool {
        self.long_to_short.contains_key(long)
    }

    /// Whether `short` is a known wire name.
    pub fn contains_short(&self, short: &str) -> bool {
        self.short_to_long.contains_key(short)
    }

    /// Number of name pairs.
    pub fn len(&self) -> usize {
        self.long_to_short.len()
    }

    /// Whether the dictionary has no pairs.
    pub fn is_empty(&self) -> bool {
        self.long_to_short.is_empty()
    }

    /// Iterate over `(long, short)` pairs in arbitrary order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.long_to_short.iter().map(|(l, s)| (*l, *s))
    }

    /// Fresh request-body skeleton for a resource type and operation.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::UnsupportedTemplate`] if the pair has no
    /// skeleton (contentInstance update, any CSEBase operation).
    pub fn template_for(&self, resource_type: ResourceType, operation: Operation) -> Result<Value> {
        templates::template_for(resource_type, operation).ok_or(
            ConsoleError::UnsupportedTemplate {
                resource_type,
                operation,
            },
        )
    }

    /// Attribute descriptions for a resource type, keyed by short name.
    pub fn describe(&self, resource_type: ResourceType) -> BTreeMap<String, String> {
        descriptions::describe(resource_type)
    }
}

/// `(long, short)` names from TS-0004 and the device management
/// specializations.
const LONG_TO_SHORT: &[(&str, &str)] = &[
    ("operation", "op"),
    ("to", "to"),
    ("from", "fr"),
    ("requestIdentifier", "rqi"),
    ("resourceType", "ty"),
    ("primitiveContent", "pc"),
    ("role", "rol"),
    ("originatingTimestamp", "ot"),
    ("requestExpirationTimestamp", "rqet"),
    ("resultExpirationTimestamp", "rset"),
    ("operationExecutionTime", "oet"),
    ("responseType", "rt"),
    ("resultPersistence", "rp"),
    ("resultContent", "rcn"),
    ("eventCategory", "ec"),
    ("deliveryAggregation", "da"),
    ("groupRequestIdentifier", "gid"),
    ("filterCriteria", "fc"),
    ("discoveryResultType", "drt"),
    ("responseStatusCode", "rsc"),
    ("requestPrimitive", "rqp"),
    ("responsePrimitive", "rsp"),
    ("accessControlPolicyIDs", "acpi"),
    ("announcedAttribute", "aa"),
    ("announceTo", "at"),
    ("creationTime", "ct"),
    ("expirationTime", "et"),
    ("labels", "lbl"),
    ("link", "lnk"),
    ("lastModifiedTime", "lt"),
    ("parentID", "pi"),
    ("resourceID", "ri"),
    ("stateTag", "st"),
    ("resourceName", "rn"),
    ("privileges", "pv"),
    ("selfPrivileges", "pvs"),
    ("App-ID", "api"),
    ("AE-ID", "aei"),
    ("appName", "apn"),
    ("pointOfAccess", "poa"),
    ("ontologyRef", "or"),
    ("nodeLink", "nl"),
    ("creator", "cr"),
    ("maxNrOfInstances", "mni"),
    ("maxByteSize", "mbs"),
    ("maxInstanceAge", "mia"),
    ("currentNrOfInstances", "cni"),
    ("currentByteSize", "cbs"),
    ("locationID", "li"),
    ("contentInfo", "cnf"),
    ("contentSize", "cs"),
    ("content", "con"),
    ("cseType", "cst"),
    ("CSE-ID", "csi"),
    ("supportedResourceType", "srt"),
    ("notificationCongestionPolicy", "ncp"),
    ("source", "sr"),
    ("target", "tg"),
    ("lifespan", "ls"),
    ("eventCat", "eca"),
    ("deliveryMetaData", "dmd"),
    ("aggregatedRequest", "arq"),
    ("eventID", "evi"),
    ("eventType", "evt"),
    ("eventStart", "evs"),
    ("eventEnd", "eve"),
    ("operationType", "opt"),
    ("dataSize", "ds"),
    ("execStatus", "exs"),
    ("execResult", "exr"),
    ("execDisable", "exd"),
    ("execTarget", "ext"),
    ("execMode", "exm"),
    ("execFrequency", "exf"),
    ("execDelay", "exy"),
    ("execNumber", "exn"),
    ("execReqArgs", "exra"),
    ("execEnable", "exe"),
    ("memberType", "mt"),
    ("currentNrOfMembers", "cnm"),
    ("maxNrOfMembers", "mnm"),
    ("memberIDs", "mid"),
    ("membersAccessControlPolicyIDs", "macp"),
    ("memberTypeValidated", "mtv"),
    ("consistencyStrategy", "csy"),
    ("groupName", "gn"),
    ("locationSource", "los"),
    ("locationUpdatePeriod", "lou"),
    ("locationTargetID", "lot"),
    ("locationServer", "lor"),
    ("locationContainerID", "loi"),
    ("locationContainerName", "lon"),
    ("locationStatus", "lost"),
    ("serviceRoles", "svr"),
    ("description", "dc"),
    ("cmdType", "cmt"),
    ("mgmtDefinition", "mgd"),
    ("objectIDs", "obis"),
    ("objectPaths", "obps"),
    ("nodeID", "ni"),
    ("hostedCSELink", "hcl"),
    ("CSEBase", "cb"),
    ("M2M-Ext-ID", "mei"),
    ("Trigger-Recipient-ID", "tri"),
    ("requestReachability", "rr"),
    ("originator", "org"),
    ("metaInformation", "mi"),
    ("requestStatus", "rs"),
    ("operationResult", "ors"),
    ("requestID", "rid"),
    ("scheduleElement", "se"),
    ("deviceIdentifier", "di"),
    ("ruleLinks", "rlk"),
    ("statsCollectID", "sci"),
    ("collectingEntityID", "cei"),
    ("collectedEntityID", "cdi"),
    ("devStatus", "ss"),
    ("statsRuleStatus", "srs"),
    ("statModel", "sm"),
    ("collectPeriod", "cp"),
    ("eventNotificationCriteria", "enc"),
    ("expirationCounter", "exc"),
    ("notificationURI", "nu"),
    ("groupID", "gpi"),
    ("notificationForwardingURI", "nfu"),
    ("batchNotify", "bn"),
    ("rateLimit", "rl"),
    ("preSubscriptionNotify", "psn"),
    ("pendingNotification", "pn"),
    ("notificationStoragePriority", "nsp"),
    ("latestNotify", "ln"),
    ("notificationContentType", "nct"),
    ("notificationEventCat", "nec"),
    ("subscriberURI", "su"),
    ("version", "vr"),
    ("URL", "url"),
    ("URI", "uri"),
    ("update", "ud"),
    ("updateStatus", "uds"),
    ("install", "in"),
    ("uninstall", "un"),
    ("installStatus", "ins"),
    ("activate", "act"),
    ("deactivate", "dea"),
    ("activeStatus", "acts"),
    ("memAvailable", "mma"),
    ("memTotal", "mmt"),
    ("areaNwkType", "ant"),
    ("listOfDevices", "ldv"),
    ("devID", "dvd"),
    ("devType", "dvt"),
    ("areaNwkId", "awi"),
    ("sleepInterval", "sli"),
    ("sleepDuration", "sld"),
    ("listOfNeighbors", "lnh"),
    ("batteryLevel", "btl"),
    ("batteryStatus", "bts"),
    ("deviceLabel", "dlb"),
    ("manufacturer", "man"),
    ("model", "mod"),
    ("deviceType", "dty"),
    ("fwVersion", "fwv"),
    ("swVersion", "swv"),
    ("hwVersion", "hwv"),
    ("capabilityName", "can"),
    ("attached", "att"),
    ("capabilityActionStatus", "cas"),
    ("enable", "ena"),
    ("disable", "dis"),
    ("currentState", "cus"),
    ("reboot", "rbo"),
    ("factoryReset", "far"),
    ("logTypeId", "lgt"),
    ("logData", "lgd"),
    ("logActionStatus", "lgs"),
    ("logStatus", "lgst"),
    ("logStart", "lga"),
    ("logStop", "lgo"),
    ("firmwareName", "fwn"),
    ("softwareName", "swn"),
    ("cmdhPolicyName", "cpn"),
    ("mgmtLink", "cmlk"),
    ("activeCmdhPolicyLink", "acmlk"),
    ("order", "od"),
    ("defEcValue", "dev"),
    ("requestOrigin", "ror"),
    ("requestContext", "rct"),
    ("requestContextNotification", "rctn"),
    ("requestCharacteristics", "rch"),
    ("applicableEventCategories", "aecs"),
    ("applicableEventCategory", "aec"),
    ("defaultRequestExpTime", "dqet"),
    ("defaultResultExpTime", "dset"),
    ("defaultOpExecTime", "doet"),
    ("defaultRespPersistence", "drp"),
    ("defaultDelAggregation", "dda"),
    ("limitsEventCategory", "lec"),
    ("limitsRequestExpTime", "lqet"),
    ("limitsResultExpTime", "lset"),
    ("limitsOpExecTime", "loet"),
    ("limitsRespPersistence", "lrp"),
    ("limitsDelAggregation", "lda"),
    ("targetNetwork", "ttn"),
    ("minReqVolume", "mrv"),
    ("backOffParameters", "bop"),
    ("otherConditions", "ohc"),
    ("maxBufferSize", "mbfs"),
    ("storagePriority", "sgp"),
    ("applicableCredIDs", "apci"),
    ("allowedApp-IDs", "aai"),
    ("allowedAEs", "aae"),
    ("accessControlPolicy", "acp"),
    ("accessControlPolicyAnnc", "acpA"),
    ("AE", "ae"),
    ("AEAnnc", "aeA"),
    ("container", "cnt"),
    ("containerAnnc", "cntA"),
    ("latest", "la"),
    ("oldest", "ol"),
    ("contentInstance", "cin"),
    ("contentInstanceAnnc", "cinA"),
    ("delivery", "dlv"),
    ("eventConfig", "evcg"),
    ("execInstance", "exin"),
    ("fanOutPoint", "fopt"),
    ("group", "grp"),
    ("groupAnnc", "grpA"),
    ("locationPolicy", "lcp"),
    ("locationPolicyAnnc", "lcpA"),
    ("m2mServiceSubscriptionProfile", "mssp"),
    ("mgmtCmd", "mgc"),
    ("mgmtObj", "mgo"),
    ("mgmtObjAnnc", "mgoA"),
    ("node", "nod"),
    ("nodeAnnc", "nodA"),
    ("pollingChannel", "pch"),
    ("pollingChannelURI", "pcu"),
    ("remoteCSE", "csr"),
    ("remoteCSEAnnc", "csrA"),
    ("request", "req"),
    ("schedule", "sch"),
    ("scheduleAnnc", "schA"),
    ("serviceSubscribedAppRule", "asar"),
    ("serviceSubscribedNode", "svsn"),
    ("statsCollect", "stcl"),
    ("statsConfig", "stcg"),
    ("subscription", "sub"),
    ("firmware", "fwr"),
    ("firmwareAnnc", "fwrA"),
    ("software", "swr"),
    ("softwareAnnc", "swrA"),
    ("memory", "mem"),
    ("memoryAnnc", "memA"),
    ("areaNwkInfo", "ani"),
    ("areaNwkInfoAnnc", "aniA"),
    ("areaNwkDeviceInfo", "andi"),
    ("areaNwkDeviceInfoAnnc", "andiA"),
    ("battery", "bat"),
    ("batteryAnnc", "batA"),
    ("deviceInfo", "dvi"),
    ("deviceInfoAnnc", "dviA"),
    ("deviceCapability", "dvc"),
    ("deviceCapabilityAnnc", "dvcA"),
    ("rebootAnnc", "rboA"),
    ("eventLog", "evl"),
    ("eventLogAnnc", "evlA"),
    ("cmdhPolicy", "cmp"),
    ("activeCmdhPolicy", "acmp"),
    ("cmdhDefaults", "cmdf"),
    ("cmdhDefEcValue", "cmdv"),
    ("cmdhEcDefParamValues", "cmpv"),
    ("cmdhLimits", "cml"),
    ("cmdhNetworkAccessRules", "cmnr"),
    ("cmdhNwAccessRule", "cmwr"),
    ("cmdhBuffer", "cmbf"),
    ("createdBefore", "crb"),
    ("createdAfter", "cra"),
    ("modifiedSince", "ms"),
    ("unmodifiedSince", "us"),
    ("stateTagSmaller", "sts"),
    ("stateTagBigger", "stb"),
    ("expireBefore", "exb"),
    ("expireAfter", "exa"),
    ("sizeAbove", "sza"),
    ("sizeBelow", "szb"),
    ("contentType", "cty"),
    ("limit", "lim"),
    ("attribute", "atr"),
    ("resourceStatus", "rss"),
    ("notificationEventType", "net"),
    ("operationMonitor", "om"),
    ("representation", "rep"),
    ("filterUsage", "fu"),
    ("eventCatType", "ect"),
    ("eventCatNo", "ecn"),
    ("number", "num"),
    ("duration", "dur"),
    ("notification", "sgn"),
    ("notificationEvent", "nev"),
    ("verificationRequest", "vrq"),
    ("subscriptionDeletion", "sud"),
    ("subscriptionReference", "sur"),
    ("accessId", "aci"),
    ("MSISDN", "msd"),
    ("action", "acn"),
    ("status", "sus"),
    ("childResource", "ch"),
    ("accessControlRule", "acr"),
    ("accessControlOriginators", "acor"),
    ("accessControlOperations", "acop"),
    ("accessControlContexts", "acco"),
    ("accessControlWindow", "actw"),
    ("accessControlIpAddresses", "acip"),
    ("ipv4Addresses", "ipv4"),
    ("ipv6Addresses", "ipv6"),
    ("accessControlLocationRegion", "aclr"),
    ("countryCode", "accc"),
    ("circRegion", "accr"),
    ("value", "val"),
    ("type", "typ"),
    ("maxNrOfNotify", "mnn"),
    ("timeWindow", "tww"),
    ("scheduleEntry", "sce"),
    ("aggregatedNotification", "agn"),
    ("attributeList", "atrl"),
    ("aggregatedResponse", "agr"),
    ("resource", "rce"),
    ("URIList", "uril"),
    ("anyArg", "any"),
    ("fileType", "ftyp"),
    ("username", "unm"),
    ("password", "pwd"),
    ("filesize", "fsi"),
    ("targetFile", "tgf"),
    ("delaySeconds", "dss"),
    ("successURL", "surl"),
    ("startTime", "stt"),
    ("completeTime", "cpt"),
    ("UUID", "uuid"),
    ("executionEnvRef", "eer"),
    ("reset", "rst"),
    ("upload", "uld"),
    ("download", "dld"),
    ("softwareInstall", "swin"),
    ("softwareUpdate", "swup"),
    ("softwareUninstall", "swun"),
    ("tracingOption", "tcop"),
    ("tracingInfo", "tcin"),
    ("responseTypeValue", "rtv"),
    ("contentSerialization", "csz"),
];
