//! Shared dialect fixture for codec, schema, packer, and handler tests.
//! Five PGNs cover the interesting shapes: a FIXED single-frame message with
//! signed scaled fields (rudder), a FIXED message whose payload bytes can
//! mimic a Fast Packet header (battery status), a FIXED message with a FLOAT
//! field and a scaling offset (environmental parameters), a VARIABLE
//! multi-frame message mixing numbers and fixed strings (meteo station), and
//! a message exercising every compile-time drop rule (product information).
use std::sync::Arc;

use crate::core::MessageDefinition;
use crate::infra::dialect::parse_dialect;
use crate::infra::registry::Registry;

pub(crate) const DIALECT_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<PGNDefinitions Version="0.1">
  <PGNInfo>
    <PGN>127245</PGN>
    <Id>rudder</Id>
    <Description>Rudder</Description>
    <Priority>2</Priority>
    <Type>Single</Type>
    <Complete>true</Complete>
    <Length>8</Length>
    <Fields>
      <Field>
        <Order>1</Order>
        <Id>rudderInstance</Id>
        <Name>Rudder Instance</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>0</BitOffset>
        <BitLength>8</BitLength>
        <Signed>false</Signed>
      </Field>
      <Field>
        <Order>2</Order>
        <Id>directionOrder</Id>
        <Name>Direction Order</Name>
        <FieldType>LOOKUP</FieldType>
        <BitOffset>8</BitOffset>
        <BitLength>3</BitLength>
        <BitStart>0</BitStart>
      </Field>
      <Field>
        <Order>3</Order>
        <Id></Id>
        <Name>Reserved</Name>
        <FieldType>RESERVED</FieldType>
        <BitOffset>11</BitOffset>
        <BitLength>5</BitLength>
        <BitStart>3</BitStart>
      </Field>
      <Field>
        <Order>4</Order>
        <Id>angleOrder</Id>
        <Name>Angle Order</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>16</BitOffset>
        <BitLength>16</BitLength>
        <Signed>true</Signed>
        <Resolution>0.0001</Resolution>
        <RangeMin>-3.14159</RangeMin>
        <RangeMax>3.14159</RangeMax>
        <Unit>rad</Unit>
        <TypeInPdf>rad</TypeInPdf>
      </Field>
      <Field>
        <Order>5</Order>
        <Id>Position</Id>
        <Name>Position</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>32</BitOffset>
        <BitLength>16</BitLength>
        <Signed>true</Signed>
        <Resolution>0.0001</Resolution>
        <RangeMin>-3.14159</RangeMin>
        <RangeMax>3.14159</RangeMax>
        <Unit>rad</Unit>
      </Field>
      <Field>
        <Order>6</Order>
        <Id></Id>
        <Name>Reserved</Name>
        <FieldType>RESERVED</FieldType>
        <BitOffset>48</BitOffset>
        <BitLength>16</BitLength>
      </Field>
    </Fields>
  </PGNInfo>
  <PGNInfo>
    <PGN>127508</PGN>
    <Id>batteryStatus</Id>
    <Description>Battery Status</Description>
    <Priority>6</Priority>
    <Type>Single</Type>
    <Complete>true</Complete>
    <Length>8</Length>
    <Fields>
      <Field>
        <Order>1</Order>
        <Id>batteryInstance</Id>
        <Name>Battery Instance</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>0</BitOffset>
        <BitLength>8</BitLength>
      </Field>
      <Field>
        <Order>2</Order>
        <Id>voltage</Id>
        <Name>Voltage</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>8</BitOffset>
        <BitLength>16</BitLength>
        <Signed>true</Signed>
        <Resolution>0.01</Resolution>
        <Unit>V</Unit>
      </Field>
      <Field>
        <Order>3</Order>
        <Id>current</Id>
        <Name>Current</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>24</BitOffset>
        <BitLength>16</BitLength>
        <Signed>true</Signed>
        <Resolution>0.1</Resolution>
        <Unit>A</Unit>
      </Field>
      <Field>
        <Order>4</Order>
        <Id>temperature</Id>
        <Name>Temperature</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>40</BitOffset>
        <BitLength>16</BitLength>
        <Resolution>0.01</Resolution>
        <Unit>K</Unit>
      </Field>
      <Field>
        <Order>5</Order>
        <Id>sid</Id>
        <Name>SID</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>56</BitOffset>
        <BitLength>8</BitLength>
      </Field>
    </Fields>
  </PGNInfo>
  <PGNInfo>
    <PGN>130310</PGN>
    <Id>environmentalParameters</Id>
    <Description>Environmental Parameters</Description>
    <Priority>5</Priority>
    <Type>Single</Type>
    <Complete>true</Complete>
    <Length>8</Length>
    <Fields>
      <Field>
        <Order>1</Order>
        <Id>sid</Id>
        <Name>SID</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>0</BitOffset>
        <BitLength>8</BitLength>
      </Field>
      <Field>
        <Order>2</Order>
        <Id>waterTemperature</Id>
        <Name>Water Temperature</Name>
        <FieldType>FLOAT</FieldType>
        <BitOffset>8</BitOffset>
        <BitLength>16</BitLength>
        <Resolution>0.01</Resolution>
        <Unit>K</Unit>
      </Field>
      <Field>
        <Order>3</Order>
        <Id>outsideTemperature</Id>
        <Name>Outside Ambient Air Temperature</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>24</BitOffset>
        <BitLength>16</BitLength>
        <Resolution>0.01</Resolution>
        <Offset>173.15</Offset>
        <Unit>K</Unit>
      </Field>
      <Field>
        <Order>4</Order>
        <Id></Id>
        <Name>Reserved</Name>
        <FieldType>RESERVED</FieldType>
        <BitOffset>40</BitOffset>
        <BitLength>24</BitLength>
      </Field>
    </Fields>
  </PGNInfo>
  <PGNInfo>
    <PGN>130323</PGN>
    <Id>meteorologicalStationData</Id>
    <Description>Meteorological Station Data</Description>
    <Priority>6</Priority>
    <Type>Fast</Type>
    <Complete>true</Complete>
    <Length>Variable</Length>
    <Fields>
      <Field>
        <Order>1</Order>
        <Id>mode</Id>
        <Name>Mode</Name>
        <FieldType>LOOKUP</FieldType>
        <BitOffset>0</BitOffset>
        <BitLength>4</BitLength>
      </Field>
      <Field>
        <Order>2</Order>
        <Id></Id>
        <Name>Reserved</Name>
        <FieldType>RESERVED</FieldType>
        <BitOffset>4</BitOffset>
        <BitLength>4</BitLength>
      </Field>
      <Field>
        <Order>3</Order>
        <Id>measurementDate</Id>
        <Name>Measurement Date</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>8</BitOffset>
        <BitLength>16</BitLength>
        <Unit>d</Unit>
      </Field>
      <Field>
        <Order>4</Order>
        <Id>measurementTime</Id>
        <Name>Measurement Time</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>24</BitOffset>
        <BitLength>32</BitLength>
        <Resolution>0.0001</Resolution>
        <Unit>s</Unit>
      </Field>
      <Field>
        <Order>5</Order>
        <Id>stationLatitude</Id>
        <Name>Station Latitude</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>56</BitOffset>
        <BitLength>32</BitLength>
        <Signed>true</Signed>
        <Resolution>0.0000001</Resolution>
        <RangeMin>-90</RangeMin>
        <RangeMax>90</RangeMax>
        <Unit>deg</Unit>
      </Field>
      <Field>
        <Order>6</Order>
        <Id>stationLongitude</Id>
        <Name>Station Longitude</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>88</BitOffset>
        <BitLength>32</BitLength>
        <Signed>true</Signed>
        <Resolution>0.0000001</Resolution>
        <RangeMin>-180</RangeMin>
        <RangeMax>180</RangeMax>
        <Unit>deg</Unit>
      </Field>
      <Field>
        <Order>7</Order>
        <Id>windSpeed</Id>
        <Name>Wind Speed</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>120</BitOffset>
        <BitLength>16</BitLength>
        <Resolution>0.01</Resolution>
        <Unit>m/s</Unit>
      </Field>
      <Field>
        <Order>8</Order>
        <Id>windDirection</Id>
        <Name>Wind Direction</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>136</BitOffset>
        <BitLength>16</BitLength>
        <Resolution>0.0001</Resolution>
        <Unit>rad</Unit>
      </Field>
      <Field>
        <Order>9</Order>
        <Id>airTemperature</Id>
        <Name>Air Temperature</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>152</BitOffset>
        <BitLength>16</BitLength>
        <Resolution>0.01</Resolution>
        <Unit>K</Unit>
      </Field>
      <Field>
        <Order>10</Order>
        <Id>atmosphericPressure</Id>
        <Name>Atmospheric Pressure</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>168</BitOffset>
        <BitLength>16</BitLength>
        <Resolution>100</Resolution>
        <Unit>Pa</Unit>
      </Field>
      <Field>
        <Order>11</Order>
        <Id>stationId</Id>
        <Name>Station ID</Name>
        <FieldType>STRING_FIX</FieldType>
        <BitOffset>184</BitOffset>
        <BitLength>160</BitLength>
      </Field>
      <Field>
        <Order>12</Order>
        <Id>stationName</Id>
        <Name>Station Name</Name>
        <FieldType>STRING_FIX</FieldType>
        <BitOffset>344</BitOffset>
        <BitLength>264</BitLength>
      </Field>
    </Fields>
  </PGNInfo>
  <PGNInfo>
    <PGN>126996</PGN>
    <Id>productInformation</Id>
    <Description>Product Information</Description>
    <Priority>6</Priority>
    <Type>Fast</Type>
    <Complete>true</Complete>
    <Length>Variable</Length>
    <Fields>
      <Field>
        <Order>1</Order>
        <Id>n2kVersion</Id>
        <Name>NMEA 2000 Version</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>0</BitOffset>
        <BitLength>16</BitLength>
        <Resolution>0.001</Resolution>
      </Field>
      <Field>
        <Order>2</Order>
        <Id>productCode</Id>
        <Name>Product Code</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>16</BitOffset>
        <BitLength>16</BitLength>
      </Field>
      <Field>
        <Order>3</Order>
        <Id>modelId</Id>
        <Name>Model ID</Name>
        <FieldType>STRING_FIX</FieldType>
        <BitOffset>32</BitOffset>
        <BitLength>256</BitLength>
      </Field>
      <Field>
        <Order>4</Order>
        <Id>softwareVersionCode</Id>
        <Name>Software Version Code</Name>
        <FieldType>STRING_LAU</FieldType>
        <BitOffset>288</BitOffset>
        <BitLength>32</BitLength>
      </Field>
      <Field>
        <Order>5</Order>
        <Id>productCode</Id>
        <Name>Product Code Copy</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>320</BitOffset>
        <BitLength>16</BitLength>
      </Field>
      <Field>
        <Order>6</Order>
        <Id></Id>
        <Name>Anonymous Counter</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>336</BitOffset>
        <BitLength>8</BitLength>
      </Field>
      <Field>
        <Order>7</Order>
        <Id>certificationLevel</Id>
        <Name>Certification Level</Name>
        <FieldType>NUMBER</FieldType>
        <BitLength>8</BitLength>
      </Field>
      <Field>
        <Order>8</Order>
        <Id>loadEquivalency</Id>
        <Name>Load Equivalency</Name>
        <FieldType>NUMBER</FieldType>
        <BitOffset>352</BitOffset>
        <BitLength>8</BitLength>
      </Field>
      <Field>
        <Order>9</Order>
        <Id>fieldGroup</Id>
        <Name>Repeating Group Start</Name>
        <TypeInPdf>Undefined</TypeInPdf>
      </Field>
    </Fields>
  </PGNInfo>
</PGNDefinitions>
"#;

pub(crate) fn definitions() -> Vec<MessageDefinition> {
    parse_dialect(DIALECT_XML).expect("fixture dialect parses")
}

pub(crate) fn registry() -> Arc<Registry> {
    Arc::new(Registry::compile(definitions()).expect("fixture dialect compiles"))
}
