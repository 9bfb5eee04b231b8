//! Numeric code tables of the oneM2M protocol.
//!
//! Each table is a closed enum with a fallback variant for codes the table
//! does not know. The protocol lets implementations define extension codes, so
//! an unknown code is carried through unchanged instead of being rejected.
//!
//! | Enum | Wire parameter | Fallback |
//! |------|----------------|----------|
//! | [`Operation`] | `op` | none, only 1..=5 exist |
//! | [`ResourceType`] | `ty` | `Unknown` |
//! | [`ResultContent`] | `rcn` | `Unknown` |
//! | [`FilterUsage`] | `fu` | `Unknown` |
//! | [`ResponseType`] | `rtv` | `Unknown` |
//! | [`DiscoveryResultType`] | `drt` | `Unknown` |
//! | [`CseType`] | `cst` | `Unknown` |
//! | [`ResponseStatusCode`] | `X-M2M-RSC` | `Other` |
//!
//! ```
//! use onem2m_console::protocol::{ResourceType, ResponseStatusCode};
//!
//! assert_eq!(ResourceType::from_code(3), ResourceType::Container);
//! assert_eq!(ResourceType::from_code(77), ResourceType::Unknown(77));
//! assert_eq!(ResourceType::Container.wrapper_key().as_deref(), Some("m2m:cnt"));
//! assert!(ResponseStatusCode::Created.is_success());
//! ```

use crate::protocol::dictionary::AttributeDictionary;
use crate::protocol::headers::PREFIX;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal, )+
        }
        fallback $fallback:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "u32", into = "u32")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A code outside the known table, carried through unchanged.
            $fallback(u32),
        }

        impl $name {
            /// Every known variant in table order.
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            /// Numeric wire code.
            pub fn code(self) -> u32 {
                match self {
                    $($name::$variant => $code,)+
                    $name::$fallback(code) => code,
                }
            }

            /// Look up a wire code; unknown codes map to the fallback variant.
            pub fn from_code(code: u32) -> Self {
                match code {
                    $($code => $name::$variant,)+
                    other => $name::$fallback(other),
                }
            }

            /// Display name from the protocol table, `None` for fallback codes.
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $($name::$variant => Some($label),)+
                    $name::$fallback(_) => None,
                }
            }

            /// Reverse lookup by display name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<u32> for $name {
            fn from(code: u32) -> Self {
                Self::from_code(code)
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> u32 {
                value.code()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "{}", self.code()),
                }
            }
        }
    };
}

/// Operation of a request primitive (`op`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Operation {
    /// Create a child resource
    Create,
    /// Retrieve a resource or discover descendants
    Retrieve,
    /// Update attributes of a resource
    Update,
    /// Delete a resource and its subtree
    Delete,
    /// Notify a subscriber
    Notify,
}

impl Operation {
    /// All operations in code order.
    pub const ALL: [Operation; 5] = [
        Operation::Create,
        Operation::Retrieve,
        Operation::Update,
        Operation::Delete,
        Operation::Notify,
    ];

    /// Numeric wire code.
    pub fn code(self) -> u8 {
        match self {
            Operation::Create => 1,
            Operation::Retrieve => 2,
            Operation::Update => 3,
            Operation::Delete => 4,
            Operation::Notify => 5,
        }
    }

    /// Look up a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        Operation::ALL.into_iter().find(|op| op.code() == code)
    }

    /// Lower-case display name.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Retrieve => "retrieve",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Notify => "notify",
        }
    }

    /// HTTP method of the oneM2M HTTP binding.
    pub fn method(self) -> http::Method {
        match self {
            Operation::Create | Operation::Notify => http::Method::POST,
            Operation::Retrieve => http::Method::GET,
            Operation::Update => http::Method::PUT,
            Operation::Delete => http::Method::DELETE,
        }
    }
}

impl TryFrom<u8> for Operation {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Operation::from_code(code).ok_or_else(|| format!("unknown operation code {}", code))
    }
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> u8 {
        op.code()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

code_enum! {
    /// Resource type (`ty`).
    pub enum ResourceType {
        /// `<accessControlPolicy>`
        AccessControlPolicy = 1 => "accessControlPolicy",
        /// `<AE>`
        Ae = 2 => "AE",
        /// `<container>`
        Container = 3 => "container",
        /// `<contentInstance>`
        ContentInstance = 4 => "contentInstance",
        /// `<CSEBase>`
        CseBase = 5 => "CSEBase",
        /// `<delivery>`
        Delivery = 6 => "delivery",
        /// `<eventConfig>`
        EventConfig = 7 => "eventConfig",
        /// `<execInstance>`
        ExecInstance = 8 => "execInstance",
        /// `<group>`
        Group = 9 => "group",
        /// `<locationPolicy>`
        LocationPolicy = 10 => "locationPolicy",
        /// `<m2mServiceSubscriptionProfile>`
        M2mServiceSubscriptionProfile = 11 => "m2mServiceSubscriptionProfile",
        /// `<mgmtCmd>`
        MgmtCmd = 12 => "mgmtCmd",
        /// `<mgmtObj>`
        MgmtObj = 13 => "mgmtObj",
        /// `<node>`
        Node = 14 => "node",
        /// `<pollingChannel>`
        PollingChannel = 15 => "pollingChannel",
        /// `<remoteCSE>`
        RemoteCse = 16 => "remoteCSE",
        /// `<request>`
        Request = 17 => "request",
        /// `<schedule>`
        Schedule = 18 => "schedule",
        /// `<serviceSubscribedAppRule>`
        ServiceSubscribedAppRule = 19 => "serviceSubscribedAppRule",
        /// `<serviceSubscribedNode>`
        ServiceSubscribedNode = 20 => "serviceSubscribedNode",
        /// `<statsCollect>`
        StatsCollect = 21 => "statsCollect",
        /// `<statsConfig>`
        StatsConfig = 22 => "statsConfig",
        /// `<subscription>`
        Subscription = 23 => "subscription",
        /// Announced `<accessControlPolicy>`
        AccessControlPolicyAnnc = 10001 => "accessControlPolicyAnnc",
        /// Announced `<AE>`
        AeAnnc = 10002 => "AEAnnc",
        /// Announced `<container>`
        ContainerAnnc = 10003 => "containerAnnc",
        /// Announced `<contentInstance>`
        ContentInstanceAnnc = 10004 => "contentInstanceAnnc",
        /// Announced `<group>`
        GroupAnnc = 10009 => "groupAnnc",
        /// Announced `<locationPolicy>`
        LocationPolicyAnnc = 10010 => "locationPolicyAnnc",
        /// Announced `<mgmtObj>`
        MgmtObjAnnc = 10013 => "mgmtObjAnnc",
        /// Announced `<node>`
        NodeAnnc = 10014 => "nodeAnnc",
        /// Announced `<remoteCSE>`
        RemoteCseAnnc = 10016 => "remoteCSEAnnc",
        /// Announced `<schedule>`
        ScheduleAnnc = 10018 => "scheduleAnnc",
    }
    fallback Unknown;
}

impl ResourceType {
    /// Short wire name of the resource type (`cnt` for container).
    pub fn short_name(self) -> Option<&'static str> {
        self.name()
            .map(|long| AttributeDictionary::standard().to_short(long))
    }

    /// Wrapper key used for payloads of this type (`m2m:cnt`).
    pub fn wrapper_key(self) -> Option<String> {
        self.short_name().map(|short| format!("{}{}", PREFIX, short))
    }
}

code_enum! {
    /// Result content (`rcn`).
    pub enum ResultContent {
        /// Nothing
        Nothing = 0 => "nothing",
        /// Attributes of the target
        Attributes = 1 => "attributes",
        /// Hierarchical address of the target
        HierarchicalAddress = 2 => "hierarchical address",
        /// Hierarchical address and attributes
        HierarchicalAddressAndAttributes = 3 => "hierarchical address and attributes",
        /// Attributes and embedded child resources
        AttributesAndChildResources = 4 => "attributes and child resources",
        /// Attributes and child resource references
        AttributesAndChildResourceReferences = 5 => "attributes and child resource references",
        /// Child resource references only
        ChildResourceReferences = 6 => "child resource references",
        /// Original resource of an announced resource
        OriginalResource = 7 => "original resource",
    }
    fallback Unknown;
}

code_enum! {
    /// Filter usage (`fu`).
    pub enum FilterUsage {
        /// Discovery: return addresses of matching descendants
        DiscoveryCriteria = 1 => "Discovery Criteria",
        /// Conditional retrieval of the target
        ConditionalRetrieval = 2 => "Conditional Retrieval",
    }
    fallback Unknown;
}

code_enum! {
    /// Response type value (`rtv`).
    pub enum ResponseType {
        /// Non-blocking, synchronous result polling
        NonBlockingRequestSynch = 1 => "nonBlockingRequestSynch",
        /// Non-blocking, asynchronous notification of the result
        NonBlockingRequestAsynch = 2 => "nonBlockingRequestAsynch",
        /// Blocking request
        BlockingRequest = 3 => "blockingRequest",
    }
    fallback Unknown;
}

code_enum! {
    /// Discovery result type (`drt`).
    pub enum DiscoveryResultType {
        /// Structured (hierarchical) addresses
        Structured = 1 => "structured",
        /// Unstructured resource ids
        Unstructured = 2 => "unstructured",
    }
    fallback Unknown;
}

code_enum! {
    /// CSE type (`cst`).
    pub enum CseType {
        /// Infrastructure node CSE
        InCse = 1 => "IN_CSE",
        /// Middle node CSE
        MnCse = 2 => "MN_CSE",
        /// Application service node CSE
        AsnCse = 3 => "ASN_CSE",
    }
    fallback Unknown;
}

code_enum! {
    /// Response status code (`rsc`, header `X-M2M-RSC`).
    pub enum ResponseStatusCode {
        /// 1000
        Accepted = 1000 => "ACCEPTED",
        /// 2000
        Ok = 2000 => "OK",
        /// 2001
        Created = 2001 => "CREATED",
        /// 2002
        Deleted = 2002 => "DELETED",
        /// 2004
        Updated = 2004 => "UPDATED",
        /// 4000
        BadRequest = 4000 => "BAD_REQUEST",
        /// 4004
        NotFound = 4004 => "NOT_FOUND",
        /// 4005
        OperationNotAllowed = 4005 => "OPERATION_NOT_ALLOWED",
        /// 4008
        RequestTimeout = 4008 => "REQUEST_TIMEOUT",
        /// 4101
        SubscriptionCreatorHasNoPrivilege = 4101 => "SUBSCRIPTION_CREATOR_HAS_NO_PRIVILEGE",
        /// 4102
        ContentsUnacceptable = 4102 => "CONTENTS_UNACCEPTABLE",
        /// 4103
        AccessDenied = 4103 => "ACCESS_DENIED",
        /// 4104
        GroupRequestIdentifierExists = 4104 => "GROUP_REQUEST_IDENTIFIER_EXISTS",
        /// 4105
        Conflict = 4105 => "CONFLICT",
        /// 5000
        InternalServerError = 5000 => "INTERNAL_SERVER_ERROR",
        /// 5001
        NotImplemented = 5001 => "NOT_IMPLEMENTED",
        /// 5103
        TargetNotReachable = 5103 => "TARGET_NOT_REACHABLE",
        /// 5105
        NoPrivilege = 5105 => "NO_PRIVILEGE",
        /// 5106
        AlreadyExists = 5106 => "ALREADY_EXISTS",
        /// 5203
        TargetNotSubscribable = 5203 => "TARGET_NOT_SUBSCRIBABLE",
        /// 5204
        SubscriptionVerificationInitiationFailed = 5204 => "SUBSCRIPTION_VERIFICATION_INITIATION_FAILED",
        /// 5205
        SubscriptionHostHasNoPrivilege = 5205 => "SUBSCRIPTION_HOST_HAS_NO_PRIVILEGE",
        /// 5206
        NonBlockingRequestNotSupported = 5206 => "NON_BLOCKING_REQUEST_NOT_SUPPORTED",
        /// 5207
        NotAcceptable = 5207 => "NOT_ACCEPTABLE",
        /// 6003
        ExternalObjectNotReachable = 6003 => "EXTERNAL_OBJECT_NOT_REACHABLE",
        /// 6005
        ExternalObjectNotFound = 6005 => "EXTERNAL_OBJECT_NOT_FOUND",
        /// 6010
        MaxNumberOfMemberExceeded = 6010 => "MAX_NUMBER_OF_MEMBER_EXCEEDED",
        /// 6011
        MemberTypeInconsistent = 6011 => "MEMBER_TYPE_INCONSISTENT",
        /// 6020
        MgmtSessionCannotBeEstablished = 6020 => "MGMT_SESSION_CANNOT_BE_ESTABLISHED",
        /// 6021
        MgmtSessionEstablishmentTimeout = 6021 => "MGMT_SESSION_ESTABLISHMENT_TIMEOUT",
        /// 6022
        InvalidCmdType = 6022 => "INVALID_CMDTYPE",
        /// 6023
        InvalidArguments = 6023 => "INVALID_ARGUMENTS",
        /// 6024
        InsufficientArguments = 6024 => "INSUFFICIENT_ARGUMENTS",
        /// 6025
        MgmtConversionError = 6025 => "MGMT_CONVERSION_ERROR",
        /// 6026
        MgmtCancellationFailed = 6026 => "MGMT_CANCELLATION_FAILED",
        /// 6028
        AlreadyComplete = 6028 => "ALREADY_COMPLETE",
        /// 6029
        MgmtCommandNotCancellable = 6029 => "MGMT_COMMAND_NOT_CANCELLABLE",
    }
    fallback Other;
}

impl ResponseStatusCode {
    /// Informational (1xxx) and success (2xxx) codes.
    #[inline]
    pub fn is_success(self) -> bool {
        (1000..3000).contains(&self.code())
    }
}
